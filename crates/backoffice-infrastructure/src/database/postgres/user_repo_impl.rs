// ============================================================================
// Backoffice Infrastructure - PostgreSQL User Repository
// File: crates/backoffice-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use backoffice_core::domain::{Role, RoleAssignment, User};
use backoffice_core::error::DomainError;
use backoffice_core::repositories::UserRepository;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
    pub is_deleted: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            email_verified: row.email_verified,
            is_deleted: row.is_deleted,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct AssignmentWithRoleRow {
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub assignment_is_active: bool,
    pub assigned_at: DateTime<Utc>,
    pub role_name: String,
    pub role_description: Option<String>,
    pub role_is_active: bool,
    pub role_created_at: DateTime<Utc>,
    pub role_modified_at: Option<DateTime<Utc>>,
}

impl From<AssignmentWithRoleRow> for (RoleAssignment, Role) {
    fn from(row: AssignmentWithRoleRow) -> Self {
        (
            RoleAssignment {
                id: row.assignment_id,
                user_id: row.user_id,
                role_id: row.role_id,
                is_active: row.assignment_is_active,
                assigned_at: row.assigned_at,
            },
            Role {
                id: row.role_id,
                name: row.role_name,
                description: row.role_description,
                is_active: row.role_is_active,
                created_at: row.role_created_at,
                modified_at: row.role_modified_at,
            },
        )
    }
}

#[derive(Debug, FromRow)]
struct AssignmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub is_active: bool,
    pub assigned_at: DateTime<Utc>,
}

impl From<AssignmentRow> for RoleAssignment {
    fn from(row: AssignmentRow) -> Self {
        RoleAssignment {
            id: row.id,
            user_id: row.user_id,
            role_id: row.role_id,
            is_active: row.is_active,
            assigned_at: row.assigned_at,
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT
                id, username, email, password, first_name, last_name,
                is_active, email_verified, is_deleted, last_login_at,
                created_at, modified_at
            FROM users
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding user by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT
                id, username, email, password, first_name, last_name,
                is_active, email_verified, is_deleted, last_login_at,
                created_at, modified_at
            FROM users
            WHERE LOWER(username) = LOWER($1) AND is_deleted = FALSE
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding user by username: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT
                id, username, email, password, first_name, last_name,
                is_active, email_verified, is_deleted, last_login_at,
                created_at, modified_at
            FROM users
            WHERE LOWER(email) = LOWER($1) AND is_deleted = FALSE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding user by email: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        info!("Creating user: {}", user.username);

        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (
                id, username, email, password, first_name, last_name,
                is_active, email_verified, is_deleted, last_login_at,
                created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING
                id, username, email, password, first_name, last_name,
                is_active, email_verified, is_deleted, last_login_at,
                created_at, modified_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.is_deleted)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .bind(user.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating user: {}", e);
            let msg = e.to_string();
            if msg.contains("ux_users_email") {
                DomainError::EmailAlreadyExists(user.email.clone())
            } else if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::UsernameAlreadyExists(user.username.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        info!("User created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let row: UserRow = sqlx::query_as(
            r#"
            UPDATE users
            SET
                username = $2,
                email = $3,
                password = $4,
                first_name = $5,
                last_name = $6,
                is_active = $7,
                email_verified = $8,
                is_deleted = $9,
                last_login_at = $10,
                modified_at = $11
            WHERE id = $1
            RETURNING
                id, username, email, password, first_name, last_name,
                is_active, email_verified, is_deleted, last_login_at,
                created_at, modified_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.is_deleted)
        .bind(user.last_login_at)
        .bind(user.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating user: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn find_assignments(
        &self,
        user_id: &Uuid,
    ) -> Result<Vec<(RoleAssignment, Role)>, DomainError> {
        let rows: Vec<AssignmentWithRoleRow> = sqlx::query_as(
            r#"
            SELECT
                ur.id AS assignment_id,
                ur.user_id,
                ur.role_id,
                ur.is_active AS assignment_is_active,
                ur.assigned_at,
                r.name AS role_name,
                r.description AS role_description,
                r.is_active AS role_is_active,
                r.created_at AS role_created_at,
                r.modified_at AS role_modified_at
            FROM user_roles ur
            INNER JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing assignments: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find_assignment(
        &self,
        user_id: &Uuid,
        role_id: &Uuid,
    ) -> Result<Option<RoleAssignment>, DomainError> {
        let row: Option<AssignmentRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, role_id, is_active, assigned_at
            FROM user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding assignment: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create_assignment(
        &self,
        assignment: &RoleAssignment,
    ) -> Result<RoleAssignment, DomainError> {
        let row: AssignmentRow = sqlx::query_as(
            r#"
            INSERT INTO user_roles (id, user_id, role_id, is_active, assigned_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, role_id, is_active, assigned_at
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.user_id)
        .bind(assignment.role_id)
        .bind(assignment.is_active)
        .bind(assignment.assigned_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating assignment: {}", e);
            let msg = e.to_string();
            if msg.contains("fk_user_roles_role") {
                DomainError::RoleNotFound
            } else if msg.contains("fk_user_roles_user") {
                DomainError::UserNotFound
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }

    async fn update_assignment(
        &self,
        assignment: &RoleAssignment,
    ) -> Result<RoleAssignment, DomainError> {
        let row: AssignmentRow = sqlx::query_as(
            r#"
            UPDATE user_roles
            SET is_active = $2, assigned_at = $3
            WHERE id = $1
            RETURNING id, user_id, role_id, is_active, assigned_at
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.is_active)
        .bind(assignment.assigned_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating assignment: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn deactivate_assignments(&self, user_id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE user_roles
            SET is_active = FALSE
            WHERE user_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deactivating assignments: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
