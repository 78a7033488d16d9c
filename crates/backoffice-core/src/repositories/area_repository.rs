//! Area repository trait (port)

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::domain::Area;
use crate::error::DomainError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait AreaRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Area>, DomainError>;
    /// Case-insensitive name lookup.
    async fn find_by_name(&self, name: &str) -> Result<Option<Area>, DomainError>;
    async fn list_active(&self) -> Result<Vec<Area>, DomainError>;
    async fn create(&self, area: &Area) -> Result<Area, DomainError>;
    async fn update(&self, area: &Area) -> Result<Area, DomainError>;
}
