// ============================================================================
// Backoffice Core - Menu Service
// File: crates/backoffice-core/src/services/menu_service.rs
// ============================================================================
//! Menu administration and tree retrieval.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use backoffice_shared::constants::ADMINISTRATOR_ROLE;

use crate::domain::{menu_tree, Menu, MenuNode};
use crate::error::DomainError;
use crate::repositories::{AreaRepository, MenuRepository};
use crate::services::role_gate;

/// Payload for creating a menu entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMenu {
    pub name: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub parent_id: Option<Uuid>,
    pub area_id: Option<Uuid>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Partial update payload; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMenu {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub parent_id: Option<Uuid>,
    pub area_id: Option<Uuid>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl UpdateMenu {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.icon.is_none()
            && self.path.is_none()
            && self.parent_id.is_none()
            && self.area_id.is_none()
            && self.sort_order.is_none()
            && self.is_active.is_none()
    }
}

pub struct MenuService<M, A>
where
    M: MenuRepository,
    A: AreaRepository,
{
    menu_repo: Arc<M>,
    area_repo: Arc<A>,
}

impl<M, A> MenuService<M, A>
where
    M: MenuRepository,
    A: AreaRepository,
{
    pub fn new(menu_repo: Arc<M>, area_repo: Arc<A>) -> Self {
        Self {
            menu_repo,
            area_repo,
        }
    }

    pub async fn menu(&self, id: &Uuid) -> Result<Menu, DomainError> {
        self.menu_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::MenuNotFound)
    }

    pub async fn create_menu(
        &self,
        actor_roles: &HashSet<String>,
        payload: CreateMenu,
    ) -> Result<Menu, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        info!("Creating menu: {}", payload.name);

        if let Some(parent_id) = &payload.parent_id {
            self.menu_repo
                .find_by_id(parent_id)
                .await?
                .ok_or(DomainError::MenuNotFound)?;
        }
        if let Some(area_id) = &payload.area_id {
            self.area_repo
                .find_by_id(area_id)
                .await?
                .ok_or(DomainError::AreaNotFound)?;
        }

        let menu = Menu::new(
            payload.name,
            payload.icon,
            payload.path,
            payload.parent_id,
            payload.area_id,
            payload.sort_order,
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.menu_repo.create(&menu).await?;
        info!("Menu created: {}", created.id);
        Ok(created)
    }

    pub async fn update_menu(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
        payload: UpdateMenu,
    ) -> Result<Menu, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        if payload.is_empty() {
            return Err(DomainError::ValidationError(
                "update payload is empty".to_string(),
            ));
        }

        let mut menu = self.menu(id).await?;

        if let Some(parent_id) = &payload.parent_id {
            if parent_id == id {
                return Err(DomainError::ValidationError(
                    "menu cannot be its own parent".to_string(),
                ));
            }
            self.menu_repo
                .find_by_id(parent_id)
                .await?
                .ok_or(DomainError::MenuNotFound)?;
            menu.parent_id = Some(*parent_id);
        }
        if let Some(area_id) = &payload.area_id {
            self.area_repo
                .find_by_id(area_id)
                .await?
                .ok_or(DomainError::AreaNotFound)?;
            menu.area_id = Some(*area_id);
        }
        if let Some(name) = payload.name {
            menu.name = name.trim().to_string();
        }
        if let Some(icon) = payload.icon {
            menu.icon = Some(icon.trim().to_string());
        }
        if let Some(path) = payload.path {
            menu.path = Some(path.trim().to_string());
        }
        if let Some(sort_order) = payload.sort_order {
            menu.sort_order = sort_order;
        }
        if let Some(is_active) = payload.is_active {
            menu.is_active = is_active;
        }
        menu.modified_at = Some(chrono::Utc::now());

        menu.validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let updated = self.menu_repo.update(&menu).await?;
        info!("Menu updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn deactivate_menu(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
    ) -> Result<Menu, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        let mut menu = self.menu(id).await?;
        if !menu.is_active {
            return Err(DomainError::AlreadyInState(
                "menu is already inactive".to_string(),
            ));
        }
        menu.deactivate();
        let updated = self.menu_repo.update(&menu).await?;
        info!("Menu deactivated: {}", updated.id);
        Ok(updated)
    }

    pub async fn reactivate_menu(
        &self,
        actor_roles: &HashSet<String>,
        id: &Uuid,
    ) -> Result<Menu, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        let mut menu = self.menu(id).await?;
        if menu.is_active {
            return Err(DomainError::AlreadyInState(
                "menu is already active".to_string(),
            ));
        }
        menu.activate();
        let updated = self.menu_repo.update(&menu).await?;
        info!("Menu reactivated: {}", updated.id);
        Ok(updated)
    }

    /// The navigation forest: active entries only. An inactive entry hides
    /// its whole subtree.
    pub async fn full_menu_tree(&self) -> Result<Vec<MenuNode>, DomainError> {
        let menus = self.menu_repo.list_all().await?;
        let active: HashSet<Uuid> = menus
            .iter()
            .filter(|m| m.is_active)
            .map(|m| m.id)
            .collect();
        let tree = menu_tree::build_tree(menus);
        Ok(menu_tree::filter_tree(tree, &active))
    }

    /// The administrative forest: every entry, active and inactive.
    pub async fn admin_menu_tree(
        &self,
        actor_roles: &HashSet<String>,
    ) -> Result<Vec<MenuNode>, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        let menus = self.menu_repo.list_all().await?;
        Ok(menu_tree::build_tree(menus))
    }

    /// Administrative forest scoped to one area. Scoping happens at the data
    /// fetch; the rows then go through the builder unmodified.
    pub async fn menu_tree_for_area(
        &self,
        actor_roles: &HashSet<String>,
        area_id: &Uuid,
    ) -> Result<Vec<MenuNode>, DomainError> {
        role_gate::require_any(&[ADMINISTRATOR_ROLE], actor_roles)?;
        self.area_repo
            .find_by_id(area_id)
            .await?
            .ok_or(DomainError::AreaNotFound)?;
        let menus = self.menu_repo.list_by_area(area_id).await?;
        Ok(menu_tree::build_tree(menus))
    }
}
