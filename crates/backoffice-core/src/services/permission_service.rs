// ============================================================================
// Backoffice Core - Permission Service
// File: crates/backoffice-core/src/services/permission_service.rs
// ============================================================================
//! Per-(role, menu) capability management.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use backoffice_shared::constants::ADMINISTRATOR_ROLE;

use crate::domain::{Permission, PermissionFlags};
use crate::error::DomainError;
use crate::repositories::{MenuRepository, PermissionRepository, RoleRepository};
use crate::services::role_gate;

/// One row of a bulk replace payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub menu_id: Uuid,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

/// Bulk replace payload: the full permission set a role is to hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacePermissionsRequest {
    pub permissions: Vec<PermissionEntry>,
}

pub struct PermissionService<P, R, M>
where
    P: PermissionRepository,
    R: RoleRepository,
    M: MenuRepository,
{
    permission_repo: Arc<P>,
    role_repo: Arc<R>,
    menu_repo: Arc<M>,
}

impl<P, R, M> PermissionService<P, R, M>
where
    P: PermissionRepository,
    R: RoleRepository,
    M: MenuRepository,
{
    pub fn new(permission_repo: Arc<P>, role_repo: Arc<R>, menu_repo: Arc<M>) -> Self {
        Self {
            permission_repo,
            role_repo,
            menu_repo,
        }
    }

    async fn require_role_exists(&self, role_id: &Uuid) -> Result<(), DomainError> {
        self.role_repo
            .find_by_id(role_id)
            .await?
            .ok_or(DomainError::RoleNotFound)?;
        Ok(())
    }

    async fn require_menu_exists(&self, menu_id: &Uuid) -> Result<(), DomainError> {
        self.menu_repo
            .find_by_id(menu_id)
            .await?
            .ok_or(DomainError::MenuNotFound)?;
        Ok(())
    }

    /// All rows held by the role; an empty list when the role exists but has
    /// none, `RoleNotFound` when the role itself is unknown.
    pub async fn permissions_for_role(
        &self,
        role_id: &Uuid,
    ) -> Result<Vec<Permission>, DomainError> {
        self.require_role_exists(role_id).await?;
        self.permission_repo.list_for_role(role_id).await
    }

    /// Replace the role's entire permission set, all-or-nothing. Referential
    /// integrity is validated up front; the storage adapter performs the
    /// delete-then-insert inside one transaction.
    pub async fn replace_permissions_for_role(
        &self,
        actor_roles: &HashSet<String>,
        role_id: &Uuid,
        request: ReplacePermissionsRequest,
    ) -> Result<Vec<Permission>, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        self.require_role_exists(role_id).await?;

        let mut seen = HashSet::new();
        for entry in &request.permissions {
            if !seen.insert(entry.menu_id) {
                return Err(DomainError::ValidationError(format!(
                    "duplicate menu id in permission set: {}",
                    entry.menu_id
                )));
            }
            self.require_menu_exists(&entry.menu_id).await?;
        }

        let rows: Vec<Permission> = request
            .permissions
            .iter()
            .map(|entry| {
                Permission::new(
                    *role_id,
                    entry.menu_id,
                    PermissionFlags {
                        can_view: Some(entry.can_view),
                        can_edit: Some(entry.can_edit),
                        can_delete: Some(entry.can_delete),
                    },
                )
            })
            .collect();

        let replaced = self.permission_repo.replace_for_role(role_id, &rows).await?;
        info!(
            "Replaced permission set for role {}: {} rows",
            role_id,
            replaced.len()
        );
        Ok(replaced)
    }

    /// Create or partially update the (role, menu) row. At least one flag
    /// must be provided; flags absent on create default to false.
    pub async fn upsert_permission(
        &self,
        actor_roles: &HashSet<String>,
        role_id: &Uuid,
        menu_id: &Uuid,
        flags: PermissionFlags,
    ) -> Result<Permission, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        if flags.is_empty() {
            return Err(DomainError::ValidationError(
                "at least one of can_view, can_edit, can_delete must be provided".to_string(),
            ));
        }
        self.require_role_exists(role_id).await?;
        self.require_menu_exists(menu_id).await?;

        match self.permission_repo.find(role_id, menu_id).await? {
            Some(mut existing) => {
                flags.apply_to(&mut existing);
                let updated = self.permission_repo.update(&existing).await?;
                info!("Permission updated for role {} menu {}", role_id, menu_id);
                Ok(updated)
            }
            None => {
                let permission = Permission::new(*role_id, *menu_id, flags);
                let created = self.permission_repo.create(&permission).await?;
                info!("Permission created for role {} menu {}", role_id, menu_id);
                Ok(created)
            }
        }
    }

    /// Delete the (role, menu) row; `PermissionNotFound` when it does not
    /// exist.
    pub async fn revoke_permission(
        &self,
        actor_roles: &HashSet<String>,
        role_id: &Uuid,
        menu_id: &Uuid,
    ) -> Result<(), DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        self.permission_repo
            .find(role_id, menu_id)
            .await?
            .ok_or(DomainError::PermissionNotFound)?;
        self.permission_repo.delete(role_id, menu_id).await?;
        info!("Permission revoked for role {} menu {}", role_id, menu_id);
        Ok(())
    }
}
