//! Role repository trait (port)

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::domain::Role;
use crate::error::DomainError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError>;
    /// Case-insensitive name lookup.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError>;
    async fn list(&self, active_only: bool) -> Result<Vec<Role>, DomainError>;
    async fn create(&self, role: &Role) -> Result<Role, DomainError>;
    async fn update(&self, role: &Role) -> Result<Role, DomainError>;
}
