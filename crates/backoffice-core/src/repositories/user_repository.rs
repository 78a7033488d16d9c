//! User repository trait (port)

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::domain::{Role, RoleAssignment, User};
use crate::error::DomainError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Soft-deleted users are never returned by the finders.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn create(&self, user: &User) -> Result<User, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Every assignment of the user together with its role row, regardless
    /// of activity state; filtering is the caller's concern.
    async fn find_assignments(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<(RoleAssignment, Role)>, DomainError>;
    async fn find_assignment(
        &self,
        user_id: &Uuid,
        role_id: &Uuid,
    ) -> Result<Option<RoleAssignment>, DomainError>;
    async fn create_assignment(
        &self,
        assignment: &RoleAssignment,
    ) -> Result<RoleAssignment, DomainError>;
    async fn update_assignment(
        &self,
        assignment: &RoleAssignment,
    ) -> Result<RoleAssignment, DomainError>;
    /// Deactivate every active assignment of the user.
    async fn deactivate_assignments(&self, user_id: &Uuid) -> Result<(), DomainError>;
}
