//! PostgreSQL repository implementations

pub mod area_repo_impl;
pub mod menu_repo_impl;
pub mod permission_repo_impl;
pub mod role_repo_impl;
pub mod user_repo_impl;

pub use area_repo_impl::PgAreaRepository;
pub use menu_repo_impl::PgMenuRepository;
pub use permission_repo_impl::PgPermissionRepository;
pub use role_repo_impl::PgRoleRepository;
pub use user_repo_impl::PgUserRepository;
