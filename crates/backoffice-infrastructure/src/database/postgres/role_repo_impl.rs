// ============================================================================
// Backoffice Infrastructure - PostgreSQL Role Repository
// File: crates/backoffice-infrastructure/src/database/postgres/role_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use backoffice_core::domain::Role;
use backoffice_core::error::DomainError;
use backoffice_core::repositories::RoleRepository;

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: row.id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError> {
        let row: Option<RoleRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, is_active, created_at, modified_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding role by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let row: Option<RoleRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, is_active, created_at, modified_at
            FROM roles
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding role by name: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Role>, DomainError> {
        let query = if active_only {
            r#"
            SELECT id, name, description, is_active, created_at, modified_at
            FROM roles
            WHERE is_active = TRUE
            ORDER BY name
            "#
        } else {
            r#"
            SELECT id, name, description, is_active, created_at, modified_at
            FROM roles
            ORDER BY name
            "#
        };

        let rows: Vec<RoleRow> = sqlx::query_as(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error listing roles: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, role: &Role) -> Result<Role, DomainError> {
        info!("Creating role: {}", role.name);

        let row: RoleRow = sqlx::query_as(
            r#"
            INSERT INTO roles (id, name, description, is_active, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, is_active, created_at, modified_at
            "#,
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.is_active)
        .bind(role.created_at)
        .bind(role.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating role: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::RoleNameAlreadyExists(role.name.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        info!("Role created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, role: &Role) -> Result<Role, DomainError> {
        let row: RoleRow = sqlx::query_as(
            r#"
            UPDATE roles
            SET
                name = $2,
                description = $3,
                is_active = $4,
                modified_at = $5
            WHERE id = $1
            RETURNING id, name, description, is_active, created_at, modified_at
            "#,
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.is_active)
        .bind(role.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating role: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::RoleNameAlreadyExists(role.name.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }
}
