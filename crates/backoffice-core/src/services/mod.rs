//! Domain services (business logic)

pub mod area_service;
pub mod auth_service;
pub mod authorization;
pub mod menu_service;
pub mod permission_service;
pub mod role_gate;
pub mod role_service;
pub mod user_service;

pub use area_service::{AreaService, CreateArea, UpdateArea};
pub use auth_service::{AuthService, LoginResult, UserInfo};
pub use authorization::AuthorizationService;
pub use menu_service::{CreateMenu, MenuService, UpdateMenu};
pub use permission_service::{PermissionEntry, PermissionService, ReplacePermissionsRequest};
pub use role_service::{CreateRole, RoleService, UpdateRole};
pub use user_service::{CreateUser, UpdateUser, UserService};
