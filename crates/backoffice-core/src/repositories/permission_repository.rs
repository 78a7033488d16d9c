//! Permission repository trait (port)

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::domain::Permission;
use crate::error::DomainError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    async fn list_for_role(&self, role_id: &Uuid) -> Result<Vec<Permission>, DomainError>;
    async fn find(
        &self,
        role_id: &Uuid,
        menu_id: &Uuid,
    ) -> Result<Option<Permission>, DomainError>;
    async fn create(&self, permission: &Permission) -> Result<Permission, DomainError>;
    async fn update(&self, permission: &Permission) -> Result<Permission, DomainError>;
    async fn delete(&self, role_id: &Uuid, menu_id: &Uuid) -> Result<(), DomainError>;

    /// Discard every row of the role and insert the given set, atomically:
    /// either all rows are replaced or the store is left unchanged.
    async fn replace_for_role(
        &self,
        role_id: &Uuid,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, DomainError>;
}
