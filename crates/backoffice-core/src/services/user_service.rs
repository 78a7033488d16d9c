// ============================================================================
// Backoffice Core - User Service
// File: crates/backoffice-core/src/services/user_service.rs
// ============================================================================
//! User administration and role assignment.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use backoffice_security::PasswordService;
use backoffice_shared::constants::{ADMINISTRATOR_ROLE, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use backoffice_shared::utils::mask_email;

use crate::domain::{effective_roles, Role, RoleAssignment, User};
use crate::error::DomainError;
use crate::repositories::{RoleRepository, UserRepository};
use crate::services::role_gate;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial update payload; `None` fields are left unchanged. Passwords are
/// not updated through this path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.is_active.is_none()
    }
}

pub struct UserService<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    user_repo: Arc<U>,
    role_repo: Arc<R>,
}

impl<U, R> UserService<U, R>
where
    U: UserRepository,
    R: RoleRepository,
{
    pub fn new(user_repo: Arc<U>, role_repo: Arc<R>) -> Self {
        Self {
            user_repo,
            role_repo,
        }
    }

    pub async fn user(&self, id: &Uuid) -> Result<User, DomainError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound)
    }

    pub async fn create_user(
        &self,
        actor_roles: &HashSet<String>,
        payload: CreateUser,
    ) -> Result<User, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        info!("Creating user with email: {}", mask_email(&payload.email));

        if payload.password.len() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::ValidationError(
                "password too short".to_string(),
            ));
        }
        if payload.password.len() > MAX_PASSWORD_LENGTH {
            return Err(DomainError::ValidationError("password too long".to_string()));
        }

        if self
            .user_repo
            .find_by_username(&payload.username)
            .await?
            .is_some()
        {
            return Err(DomainError::UsernameAlreadyExists(payload.username));
        }
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists(payload.email));
        }

        let password_hash = PasswordService::hash(&payload.password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        let user = User::new(
            payload.username,
            payload.email,
            Some(password_hash),
            payload.first_name,
            payload.last_name,
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.user_repo.create(&user).await?;
        info!("User created: {}", created.id);
        Ok(created)
    }

    pub async fn update_user(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
        payload: UpdateUser,
    ) -> Result<User, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        if payload.is_empty() {
            return Err(DomainError::ValidationError(
                "update payload is empty".to_string(),
            ));
        }

        let mut user = self.user(id).await?;

        if let Some(username) = payload.username {
            let username = username.trim().to_string();
            if !username.eq_ignore_ascii_case(&user.username) {
                if let Some(existing) = self.user_repo.find_by_username(&username).await? {
                    if existing.id != *id {
                        return Err(DomainError::UsernameAlreadyExists(username));
                    }
                }
            }
            user.username = username;
        }
        if let Some(email) = payload.email {
            let email = email.trim().to_lowercase();
            if email != user.email {
                if let Some(existing) = self.user_repo.find_by_email(&email).await? {
                    if existing.id != *id {
                        return Err(DomainError::EmailAlreadyExists(email));
                    }
                }
            }
            user.email = email;
        }
        if let Some(first_name) = payload.first_name {
            user.first_name = Some(first_name.trim().to_string());
        }
        if let Some(last_name) = payload.last_name {
            user.last_name = Some(last_name.trim().to_string());
        }
        if let Some(is_active) = payload.is_active {
            user.is_active = is_active;
        }
        user.modified_at = Some(chrono::Utc::now());

        user.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let updated = self.user_repo.update(&user).await?;
        info!("User updated: {}", updated.id);
        Ok(updated)
    }

    /// Soft delete; the user's active role assignments are deactivated as
    /// well. A failure to deactivate assignments is logged but does not undo
    /// the deletion.
    pub async fn delete_user(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
    ) -> Result<(), DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        let mut user = self.user(id).await?;
        user.soft_delete();
        self.user_repo.update(&user).await?;

        if let Err(e) = self.user_repo.deactivate_assignments(id).await {
            error!("Failed to deactivate assignments for deleted user {}: {}", id, e);
        }

        info!("User deleted: {}", id);
        Ok(())
    }

    /// Assign a role. An existing inactive assignment is reactivated; an
    /// existing active one is returned unchanged.
    pub async fn assign_role(
        &self,
        actor_roles: &HashSet<String>,
        user_id: &Uuid,
        role_id: &Uuid,
    ) -> Result<RoleAssignment, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;

        self.user(user_id).await?;
        let role = self
            .role_repo
            .find_by_id(role_id)
            .await?
            .ok_or(DomainError::RoleNotFound)?;
        if !role.is_active {
            return Err(DomainError::ValidationError(format!(
                "role {} is not active",
                role.name
            )));
        }

        match self.user_repo.find_assignment(user_id, role_id).await? {
            Some(assignment) if assignment.is_active => {
                info!(
                    "Role {} already assigned and active for user {}",
                    role_id, user_id
                );
                Ok(assignment)
            }
            Some(mut assignment) => {
                assignment.reactivate();
                let updated = self.user_repo.update_assignment(&assignment).await?;
                info!("Reactivated assignment of role {} to user {}", role_id, user_id);
                Ok(updated)
            }
            None => {
                let assignment = RoleAssignment::new(*user_id, *role_id);
                let created = self.user_repo.create_assignment(&assignment).await?;
                info!("Assigned role {} to user {}", role_id, user_id);
                Ok(created)
            }
        }
    }

    /// Revoke (deactivate) an assignment. An already-inactive assignment is
    /// returned unchanged.
    pub async fn revoke_role(
        &self,
        actor_roles: &HashSet<String>,
        user_id: &Uuid,
        role_id: &Uuid,
    ) -> Result<RoleAssignment, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;

        let assignment = self
            .user_repo
            .find_assignment(user_id, role_id)
            .await?
            .ok_or(DomainError::RoleAssignmentNotFound)?;

        if !assignment.is_active {
            info!(
                "Assignment of role {} to user {} was already inactive",
                role_id, user_id
            );
            return Ok(assignment);
        }

        let mut assignment = assignment;
        assignment.deactivate();
        let updated = self.user_repo.update_assignment(&assignment).await?;
        info!("Revoked role {} from user {}", role_id, user_id);
        Ok(updated)
    }

    /// Active roles of the user, sorted by name.
    pub async fn roles_of_user(&self, user_id: &Uuid) -> Result<Vec<Role>, DomainError> {
        let assignments = self.user_repo.find_assignments(user_id).await?;
        Ok(effective_roles(assignments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::repositories::{MockRoleRepository, MockUserRepository};

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn admin() -> HashSet<String> {
        [ADMINISTRATOR_ROLE.to_string()].into_iter().collect()
    }

    fn user(id: u128) -> User {
        User {
            id: uid(id),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: None,
            first_name: None,
            last_name: None,
            is_active: true,
            email_verified: false,
            is_deleted: false,
            last_login_at: None,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    fn role(id: u128, active: bool) -> Role {
        Role {
            id: uid(id),
            name: "Supervisor".to_string(),
            description: None,
            is_active: active,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    fn service(
        user_repo: MockUserRepository,
        role_repo: MockRoleRepository,
    ) -> UserService<MockUserRepository, MockRoleRepository> {
        UserService::new(Arc::new(user_repo), Arc::new(role_repo))
    }

    fn create_payload() -> CreateUser {
        CreateUser {
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password: "a sufficiently long password".to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let service = service(MockUserRepository::new(), MockRoleRepository::new());
        let result = service
            .create_user(
                &admin(),
                CreateUser {
                    password: "short".to_string(),
                    ..create_payload()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(1))));

        let service = service(user_repo, MockRoleRepository::new());
        let result = service.create_user(&admin(), create_payload()).await;
        assert!(matches!(result, Err(DomainError::UsernameAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().returning(|_| Ok(None));
        user_repo.expect_find_by_email().returning(|_| Ok(None));
        user_repo.expect_create().returning(|u| Ok(u.clone()));

        let service = service(user_repo, MockRoleRepository::new());
        let created = service.create_user(&admin(), create_payload()).await.unwrap();
        let hash = created.password_hash.expect("password must be hashed");
        assert_ne!(hash, "a sufficiently long password");
        assert!(PasswordService::verify("a sufficiently long password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_assign_role_creates_new_assignment() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1))));
        user_repo.expect_find_assignment().returning(|_, _| Ok(None));
        user_repo
            .expect_create_assignment()
            .returning(|a| Ok(a.clone()));

        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(role(2, true))));

        let service = service(user_repo, role_repo);
        let assignment = service.assign_role(&admin(), &uid(1), &uid(2)).await.unwrap();
        assert!(assignment.is_active);
        assert_eq!(assignment.role_id, uid(2));
    }

    #[tokio::test]
    async fn test_assign_role_reactivates_inactive_assignment() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1))));
        user_repo.expect_find_assignment().returning(|user_id, role_id| {
            let mut assignment = RoleAssignment::new(*user_id, *role_id);
            assignment.deactivate();
            Ok(Some(assignment))
        });
        user_repo
            .expect_update_assignment()
            .returning(|a| Ok(a.clone()));
        user_repo.expect_create_assignment().times(0);

        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(role(2, true))));

        let service = service(user_repo, role_repo);
        let assignment = service.assign_role(&admin(), &uid(1), &uid(2)).await.unwrap();
        assert!(assignment.is_active);
    }

    #[tokio::test]
    async fn test_assign_inactive_role_rejected() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1))));

        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(role(2, false))));

        let service = service(user_repo, role_repo);
        let result = service.assign_role(&admin(), &uid(1), &uid(2)).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_revoke_missing_assignment_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_assignment().returning(|_, _| Ok(None));

        let service = service(user_repo, MockRoleRepository::new());
        let result = service.revoke_role(&admin(), &uid(1), &uid(2)).await;
        assert!(matches!(result, Err(DomainError::RoleAssignmentNotFound)));
    }

    #[tokio::test]
    async fn test_delete_user_deactivates_assignments() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Ok(Some(user(1))));
        user_repo
            .expect_update()
            .withf(|u| u.is_deleted && !u.is_active)
            .returning(|u| Ok(u.clone()));
        user_repo
            .expect_deactivate_assignments()
            .times(1)
            .returning(|_| Ok(()));

        let service = service(user_repo, MockRoleRepository::new());
        service.delete_user(&admin(), &uid(1)).await.unwrap();
    }
}
