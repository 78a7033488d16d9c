// ============================================================================
// Backoffice Core - Area Service
// File: crates/backoffice-core/src/services/area_service.rs
// ============================================================================
//! Administrative areas that group menu entries.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use backoffice_shared::constants::ADMINISTRATOR_ROLE;

use crate::domain::Area;
use crate::error::DomainError;
use crate::repositories::AreaRepository;
use crate::services::role_gate;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArea {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Partial update payload; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArea {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl UpdateArea {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.icon.is_none()
    }
}

pub struct AreaService<A: AreaRepository> {
    area_repo: Arc<A>,
}

impl<A: AreaRepository> AreaService<A> {
    pub fn new(area_repo: Arc<A>) -> Self {
        Self { area_repo }
    }

    pub async fn area(&self, id: &Uuid) -> Result<Area, DomainError> {
        self.area_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::AreaNotFound)
    }

    pub async fn active_areas(&self) -> Result<Vec<Area>, DomainError> {
        self.area_repo.list_active().await
    }

    pub async fn create_area(
        &self,
        actor_roles: &HashSet<String>,
        payload: CreateArea,
    ) -> Result<Area, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        info!("Creating area: {}", payload.name);

        let name = payload.name.trim().to_string();
        if self.area_repo.find_by_name(&name).await?.is_some() {
            return Err(DomainError::AreaNameAlreadyExists(name));
        }

        let area = Area::new(name, payload.description, payload.icon)
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.area_repo.create(&area).await?;
        info!("Area created: {}", created.id);
        Ok(created)
    }

    pub async fn update_area(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
        payload: UpdateArea,
    ) -> Result<Area, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        if payload.is_empty() {
            return Err(DomainError::ValidationError(
                "update payload is empty".to_string(),
            ));
        }

        let mut area = self.area(id).await?;

        if let Some(name) = payload.name {
            let name = name.trim().to_string();
            // uniqueness is case-insensitive, excluding this record itself
            if !name.eq_ignore_ascii_case(&area.name) {
                if let Some(existing) = self.area_repo.find_by_name(&name).await? {
                    if existing.id != *id {
                        return Err(DomainError::AreaNameAlreadyExists(name));
                    }
                }
            }
            area.name = name;
        }
        if let Some(description) = payload.description {
            area.description = Some(description.trim().to_string());
        }
        if let Some(icon) = payload.icon {
            area.icon = Some(icon.trim().to_string());
        }
        area.modified_at = Some(chrono::Utc::now());

        area.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let updated = self.area_repo.update(&area).await?;
        info!("Area updated: {}", updated.id);
        Ok(updated)
    }

    /// Flag flip only: menus owned by the area are left untouched in either
    /// direction.
    pub async fn set_area_active(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
        active: bool,
    ) -> Result<Area, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        let mut area = self.area(id).await?;
        if area.is_active == active {
            let state = if active { "active" } else { "inactive" };
            return Err(DomainError::AlreadyInState(format!(
                "area is already {}",
                state
            )));
        }
        area.set_active(active);
        let updated = self.area_repo.update(&area).await?;
        info!("Area {}: {}", if active { "reactivated" } else { "deactivated" }, updated.id);
        Ok(updated)
    }
}
