//! # Backoffice Core - Domain Module
//!
//! Domain entities for the backoffice access-control system.

pub mod area;
pub mod menu;
pub mod menu_tree;
pub mod permission;
pub mod role;
pub mod role_assignment;
pub mod user;

// Re-export all entities
pub use area::Area;
pub use menu::Menu;
pub use menu_tree::MenuNode;
pub use permission::{Capability, Permission, PermissionFlags};
pub use role::Role;
pub use role_assignment::{effective_roles, RoleAssignment};
pub use user::User;
