//! Repository traits (ports)

pub mod area_repository;
pub mod menu_repository;
pub mod permission_repository;
pub mod role_repository;
pub mod user_repository;

pub use area_repository::AreaRepository;
pub use menu_repository::MenuRepository;
pub use permission_repository::PermissionRepository;
pub use role_repository::RoleRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use area_repository::MockAreaRepository;
#[cfg(test)]
pub use menu_repository::MockMenuRepository;
#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
