// ============================================================================
// Backoffice Infrastructure - PostgreSQL Permission Repository
// File: crates/backoffice-infrastructure/src/database/postgres/permission_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use backoffice_core::domain::Permission;
use backoffice_core::error::DomainError;
use backoffice_core::repositories::PermissionRepository;

pub struct PgPermissionRepository {
    pool: PgPool,
}

impl PgPermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct PermissionRow {
    pub id: Uuid,
    pub role_id: Uuid,
    pub menu_id: Uuid,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Permission {
            id: row.id,
            role_id: row.role_id,
            menu_id: row.menu_id,
            can_view: row.can_view,
            can_edit: row.can_edit,
            can_delete: row.can_delete,
        }
    }
}

fn map_constraint_error(e: sqlx::Error) -> DomainError {
    let msg = e.to_string();
    if msg.contains("fk_menu_permissions_menu") {
        DomainError::MenuNotFound
    } else if msg.contains("fk_menu_permissions_role") {
        DomainError::RoleNotFound
    } else if msg.contains("unique") || msg.contains("duplicate") {
        DomainError::ValidationError("duplicate permission for role and menu".to_string())
    } else {
        DomainError::DatabaseError(msg)
    }
}

#[async_trait]
impl PermissionRepository for PgPermissionRepository {
    async fn list_for_role(&self, role_id: &Uuid) -> Result<Vec<Permission>, DomainError> {
        let rows: Vec<PermissionRow> = sqlx::query_as(
            r#"
            SELECT id, role_id, menu_id, can_view, can_edit, can_delete
            FROM menu_permissions
            WHERE role_id = $1
            ORDER BY menu_id
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing permissions for role: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn find(
        &self,
        role_id: &Uuid,
        menu_id: &Uuid,
    ) -> Result<Option<Permission>, DomainError> {
        let row: Option<PermissionRow> = sqlx::query_as(
            r#"
            SELECT id, role_id, menu_id, can_view, can_edit, can_delete
            FROM menu_permissions
            WHERE role_id = $1 AND menu_id = $2
            "#,
        )
        .bind(role_id)
        .bind(menu_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding permission: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, permission: &Permission) -> Result<Permission, DomainError> {
        let row: PermissionRow = sqlx::query_as(
            r#"
            INSERT INTO menu_permissions (id, role_id, menu_id, can_view, can_edit, can_delete)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, role_id, menu_id, can_view, can_edit, can_delete
            "#,
        )
        .bind(permission.id)
        .bind(permission.role_id)
        .bind(permission.menu_id)
        .bind(permission.can_view)
        .bind(permission.can_edit)
        .bind(permission.can_delete)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating permission: {}", e);
            map_constraint_error(e)
        })?;

        Ok(row.into())
    }

    async fn update(&self, permission: &Permission) -> Result<Permission, DomainError> {
        let row: PermissionRow = sqlx::query_as(
            r#"
            UPDATE menu_permissions
            SET can_view = $2, can_edit = $3, can_delete = $4
            WHERE id = $1
            RETURNING id, role_id, menu_id, can_view, can_edit, can_delete
            "#,
        )
        .bind(permission.id)
        .bind(permission.can_view)
        .bind(permission.can_edit)
        .bind(permission.can_delete)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating permission: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn delete(&self, role_id: &Uuid, menu_id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            DELETE FROM menu_permissions
            WHERE role_id = $1 AND menu_id = $2
            "#,
        )
        .bind(role_id)
        .bind(menu_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting permission: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    /// Delete-then-insert inside one transaction. Concurrent replaces for the
    /// same role serialize on the deleted rows; any failure rolls the whole
    /// batch back.
    async fn replace_for_role(
        &self,
        role_id: &Uuid,
        permissions: &[Permission],
    ) -> Result<Vec<Permission>, DomainError> {
        info!(
            "Replacing permission set for role {} with {} rows",
            role_id,
            permissions.len()
        );

        let mut tx = self.pool.begin().await.map_err(|e: sqlx::Error| {
            error!("Database error starting permission replace: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        sqlx::query("DELETE FROM menu_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error clearing permissions for role: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        let mut inserted = Vec::with_capacity(permissions.len());
        for permission in permissions {
            let row: PermissionRow = sqlx::query_as(
                r#"
                INSERT INTO menu_permissions (id, role_id, menu_id, can_view, can_edit, can_delete)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, role_id, menu_id, can_view, can_edit, can_delete
                "#,
            )
            .bind(permission.id)
            .bind(permission.role_id)
            .bind(permission.menu_id)
            .bind(permission.can_view)
            .bind(permission.can_edit)
            .bind(permission.can_delete)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e: sqlx::Error| {
                // dropping the transaction rolls back the delete and the
                // inserts done so far
                error!("Database error inserting permission during replace: {}", e);
                map_constraint_error(e)
            })?;
            inserted.push(row.into());
        }

        tx.commit().await.map_err(|e: sqlx::Error| {
            error!("Database error committing permission replace: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!("Permission set replaced for role {}", role_id);
        Ok(inserted)
    }
}
