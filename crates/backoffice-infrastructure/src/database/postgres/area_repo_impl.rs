// ============================================================================
// Backoffice Infrastructure - PostgreSQL Area Repository
// File: crates/backoffice-infrastructure/src/database/postgres/area_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use backoffice_core::domain::Area;
use backoffice_core::error::DomainError;
use backoffice_core::repositories::AreaRepository;

pub struct PgAreaRepository {
    pool: PgPool,
}

impl PgAreaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AreaRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<AreaRow> for Area {
    fn from(row: AreaRow) -> Self {
        Area {
            id: row.id,
            name: row.name,
            description: row.description,
            icon: row.icon,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl AreaRepository for PgAreaRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Area>, DomainError> {
        let row: Option<AreaRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, icon, is_active, created_at, modified_at
            FROM areas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding area by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Area>, DomainError> {
        let row: Option<AreaRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, icon, is_active, created_at, modified_at
            FROM areas
            WHERE LOWER(name) = LOWER($1)
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding area by name: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_active(&self) -> Result<Vec<Area>, DomainError> {
        let rows: Vec<AreaRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, icon, is_active, created_at, modified_at
            FROM areas
            WHERE is_active = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing active areas: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, area: &Area) -> Result<Area, DomainError> {
        info!("Creating area: {}", area.name);

        let row: AreaRow = sqlx::query_as(
            r#"
            INSERT INTO areas (id, name, description, icon, is_active, created_at, modified_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, icon, is_active, created_at, modified_at
            "#,
        )
        .bind(area.id)
        .bind(&area.name)
        .bind(&area.description)
        .bind(&area.icon)
        .bind(area.is_active)
        .bind(area.created_at)
        .bind(area.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating area: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AreaNameAlreadyExists(area.name.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        info!("Area created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, area: &Area) -> Result<Area, DomainError> {
        let row: AreaRow = sqlx::query_as(
            r#"
            UPDATE areas
            SET
                name = $2,
                description = $3,
                icon = $4,
                is_active = $5,
                modified_at = $6
            WHERE id = $1
            RETURNING id, name, description, icon, is_active, created_at, modified_at
            "#,
        )
        .bind(area.id)
        .bind(&area.name)
        .bind(&area.description)
        .bind(&area.icon)
        .bind(area.is_active)
        .bind(area.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating area: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AreaNameAlreadyExists(area.name.clone())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }
}
