// ============================================================================
// Backoffice Infrastructure - PostgreSQL Menu Repository
// File: crates/backoffice-infrastructure/src/database/postgres/menu_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use backoffice_core::domain::Menu;
use backoffice_core::error::DomainError;
use backoffice_core::repositories::MenuRepository;

pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct MenuRow {
    pub id: Uuid,
    pub area_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<MenuRow> for Menu {
    fn from(row: MenuRow) -> Self {
        Menu {
            id: row.id,
            area_id: row.area_id,
            parent_id: row.parent_id,
            name: row.name,
            icon: row.icon,
            path: row.path,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Menu>, DomainError> {
        let row: Option<MenuRow> = sqlx::query_as(
            r#"
            SELECT
                id, area_id, parent_id, name, icon, path,
                sort_order, is_active, created_at, modified_at
            FROM menus
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding menu by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_all(&self) -> Result<Vec<Menu>, DomainError> {
        let rows: Vec<MenuRow> = sqlx::query_as(
            r#"
            SELECT
                id, area_id, parent_id, name, icon, path,
                sort_order, is_active, created_at, modified_at
            FROM menus
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing menus: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_by_area(&self, area_id: &Uuid) -> Result<Vec<Menu>, DomainError> {
        let rows: Vec<MenuRow> = sqlx::query_as(
            r#"
            SELECT
                id, area_id, parent_id, name, icon, path,
                sort_order, is_active, created_at, modified_at
            FROM menus
            WHERE area_id = $1
            "#,
        )
        .bind(area_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing menus by area: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create(&self, menu: &Menu) -> Result<Menu, DomainError> {
        info!("Creating menu: {}", menu.name);

        let row: MenuRow = sqlx::query_as(
            r#"
            INSERT INTO menus (
                id, area_id, parent_id, name, icon, path,
                sort_order, is_active, created_at, modified_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING
                id, area_id, parent_id, name, icon, path,
                sort_order, is_active, created_at, modified_at
            "#,
        )
        .bind(menu.id)
        .bind(menu.area_id)
        .bind(menu.parent_id)
        .bind(&menu.name)
        .bind(&menu.icon)
        .bind(&menu.path)
        .bind(menu.sort_order)
        .bind(menu.is_active)
        .bind(menu.created_at)
        .bind(menu.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating menu: {}", e);
            let msg = e.to_string();
            if msg.contains("fk_menus_parent") {
                DomainError::MenuNotFound
            } else if msg.contains("fk_menus_area") {
                DomainError::AreaNotFound
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        info!("Menu created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn update(&self, menu: &Menu) -> Result<Menu, DomainError> {
        let row: MenuRow = sqlx::query_as(
            r#"
            UPDATE menus
            SET
                area_id = $2,
                parent_id = $3,
                name = $4,
                icon = $5,
                path = $6,
                sort_order = $7,
                is_active = $8,
                modified_at = $9
            WHERE id = $1
            RETURNING
                id, area_id, parent_id, name, icon, path,
                sort_order, is_active, created_at, modified_at
            "#,
        )
        .bind(menu.id)
        .bind(menu.area_id)
        .bind(menu.parent_id)
        .bind(&menu.name)
        .bind(&menu.icon)
        .bind(&menu.path)
        .bind(menu.sort_order)
        .bind(menu.is_active)
        .bind(menu.modified_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating menu: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }
}
