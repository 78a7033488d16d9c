// ============================================================================
// Backoffice Core - Authentication Service
// File: crates/backoffice-core/src/services/auth_service.rs
// ============================================================================
//! Login and bearer-token authentication.
//!
//! Token signing and expiry live in `backoffice-security`; this service only
//! maps between principals and tokens.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use backoffice_security::{JwtService, PasswordService};

use crate::domain::User;
use crate::error::DomainError;
use crate::repositories::UserRepository;

pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_secret: String,
    jwt_access_expiry: i64,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, jwt_secret: String, jwt_access_expiry: i64) -> Self {
        Self {
            user_repo,
            jwt_secret,
            jwt_access_expiry,
        }
    }

    fn jwt(&self) -> JwtService {
        JwtService::new(self.jwt_secret.clone(), self.jwt_access_expiry)
    }

    /// Login with username and password.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResult, DomainError> {
        info!("Login attempt for user: {}", username);

        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown user: {}", username);
                DomainError::InvalidCredentials
            })?;

        if !user.can_login() {
            warn!("Login failed: user cannot login: {}", username);
            return Err(DomainError::UserNotActive);
        }

        let stored_hash = user
            .password_hash
            .as_ref()
            .ok_or(DomainError::InvalidCredentials)?;

        let password_valid = PasswordService::verify(password, stored_hash)
            .map_err(|_e| DomainError::InvalidCredentials)?;
        if !password_valid {
            warn!("Login failed: invalid password for: {}", username);
            return Err(DomainError::InvalidCredentials);
        }

        let access_token = self
            .jwt()
            .generate_access_token(&user.id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        let mut updated_user = user.clone();
        updated_user.record_login();
        if let Err(e) = self.user_repo.update(&updated_user).await {
            // a missed login timestamp must not fail the login
            error!("Failed to record last login: {}", e);
        }

        info!("Login successful for: {}", username);

        Ok(LoginResult {
            user: UserInfo::from(&updated_user),
            access_token,
        })
    }

    /// Resolve a bearer token to its principal. Any token failure maps to
    /// `Unauthenticated` without detail.
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let user_id = self.jwt().authenticate(token).map_err(|e| {
            warn!("Token rejected: {}", e);
            DomainError::Unauthenticated
        })?;

        let user = self
            .user_repo
            .find_by_id(&user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)?;

        if !user.can_login() {
            return Err(DomainError::UserNotActive);
        }

        Ok(user)
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user: UserInfo,
    pub access_token: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub email_verified: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name(),
            email_verified: user.email_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::repositories::MockUserRepository;

    fn user_with_password(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: Some(PasswordService::hash(password).unwrap()),
            first_name: None,
            last_name: None,
            is_active: true,
            email_verified: true,
            is_deleted: false,
            last_login_at: None,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    fn service(user_repo: MockUserRepository) -> AuthService<MockUserRepository> {
        AuthService::new(Arc::new(user_repo), "test-secret".to_string(), 900)
    }

    #[tokio::test]
    async fn test_login_issues_usable_token() {
        let user = user_with_password("a sufficiently long password");
        let user_id = user.id;

        let mut user_repo = MockUserRepository::new();
        let for_login = user.clone();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(for_login.clone())));
        user_repo.expect_update().returning(|u| Ok(u.clone()));
        user_repo
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(user_repo);
        let result = service
            .login("jdoe", "a sufficiently long password")
            .await
            .unwrap();
        assert_eq!(result.user.id, user_id);

        let authenticated = service.authenticate(&result.access_token).await.unwrap();
        assert_eq!(authenticated.id, user_id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let user = user_with_password("a sufficiently long password");

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(user_repo);
        let result = service.login("jdoe", "wrong password").await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_rejected() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_username().returning(|_| Ok(None));

        let service = service(user_repo);
        let result = service.login("ghost", "whatever password").await;
        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login() {
        let mut user = user_with_password("a sufficiently long password");
        user.is_active = false;

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = service(user_repo);
        let result = service.login("jdoe", "a sufficiently long password").await;
        assert!(matches!(result, Err(DomainError::UserNotActive)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthenticated() {
        let service = service(MockUserRepository::new());
        let result = service.authenticate("not-a-token").await;
        assert!(matches!(result, Err(DomainError::Unauthenticated)));
    }
}
