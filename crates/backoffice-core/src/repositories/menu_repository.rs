//! Menu repository trait (port)

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::domain::Menu;
use crate::error::DomainError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Menu>, DomainError>;
    /// All menu rows, active and inactive, unordered.
    async fn list_all(&self) -> Result<Vec<Menu>, DomainError>;
    /// Rows owned by one area, active and inactive.
    async fn list_by_area(&self, area_id: &Uuid) -> Result<Vec<Menu>, DomainError>;
    async fn create(&self, menu: &Menu) -> Result<Menu, DomainError>;
    async fn update(&self, menu: &Menu) -> Result<Menu, DomainError>;
}
