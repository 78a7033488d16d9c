// ============================================================================
// Backoffice Core - Role Service
// File: crates/backoffice-core/src/services/role_service.rs
// ============================================================================
//! Role administration.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use backoffice_shared::constants::ADMINISTRATOR_ROLE;

use crate::domain::Role;
use crate::error::DomainError;
use crate::repositories::RoleRepository;
use crate::services::role_gate;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRole {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update payload; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateRole {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

pub struct RoleService<R: RoleRepository> {
    role_repo: Arc<R>,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(role_repo: Arc<R>) -> Self {
        Self { role_repo }
    }

    pub async fn role(&self, id: &Uuid) -> Result<Role, DomainError> {
        self.role_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::RoleNotFound)
    }

    pub async fn roles(&self, active_only: bool) -> Result<Vec<Role>, DomainError> {
        self.role_repo.list(active_only).await
    }

    pub async fn create_role(
        &self,
        actor_roles: &HashSet<String>,
        payload: CreateRole,
    ) -> Result<Role, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        info!("Creating role: {}", payload.name);

        let name = payload.name.trim().to_string();
        if self.role_repo.find_by_name(&name).await?.is_some() {
            return Err(DomainError::RoleNameAlreadyExists(name));
        }

        let role = Role::new(name, payload.description)
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.role_repo.create(&role).await?;
        info!("Role created: {}", created.id);
        Ok(created)
    }

    pub async fn update_role(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
        payload: UpdateRole,
    ) -> Result<Role, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        if payload.is_empty() {
            return Err(DomainError::ValidationError(
                "update payload is empty".to_string(),
            ));
        }

        let mut role = self.role(id).await?;

        if let Some(name) = payload.name {
            let name = name.trim().to_string();
            if !name.eq_ignore_ascii_case(&role.name) {
                if let Some(existing) = self.role_repo.find_by_name(&name).await? {
                    if existing.id != *id {
                        return Err(DomainError::RoleNameAlreadyExists(name));
                    }
                }
            }
            role.name = name;
        }
        if let Some(description) = payload.description {
            role.description = Some(description.trim().to_string());
        }
        role.modified_at = Some(chrono::Utc::now());

        role.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let updated = self.role_repo.update(&role).await?;
        info!("Role updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn deactivate_role(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
    ) -> Result<Role, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        let mut role = self.role(id).await?;
        if !role.is_active {
            return Err(DomainError::AlreadyInState(
                "role is already inactive".to_string(),
            ));
        }
        role.deactivate();
        let updated = self.role_repo.update(&role).await?;
        info!("Role deactivated: {}", updated.id);
        Ok(updated)
    }

    pub async fn reactivate_role(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
    ) -> Result<Role, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        let mut role = self.role(id).await?;
        if role.is_active {
            return Err(DomainError::AlreadyInState(
                "role is already active".to_string(),
            ));
        }
        role.activate();
        let updated = self.role_repo.update(&role).await?;
        info!("Role reactivated: {}", updated.id);
        Ok(updated)
    }
}
