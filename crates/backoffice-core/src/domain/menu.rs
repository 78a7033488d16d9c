// ============================================================================
// Backoffice Core - Menu Entity
// File: crates/backoffice-core/src/domain/menu.rs
// Description: Single entry of the navigation hierarchy
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Menu entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Menu {
    pub id: Uuid,
    pub area_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100, message = "Menu name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 50, message = "Menu icon too long"))]
    pub icon: Option<String>,

    #[validate(length(max = 255, message = "Menu path too long"))]
    pub path: Option<String>,

    /// Sibling position within the parent; ties are broken by name.
    pub sort_order: i32,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Menu {
    pub fn new(
        name: String,
        icon: Option<String>,
        path: Option<String>,
        parent_id: Option<Uuid>,
        area_id: Option<Uuid>,
        sort_order: i32,
    ) -> Result<Self, validator::ValidationErrors> {
        let menu = Self {
            id: Uuid::new_v4(),
            area_id,
            parent_id,
            name: name.trim().to_string(),
            icon: icon.map(|i| i.trim().to_string()),
            path: path.map(|p| p.trim().to_string()),
            sort_order,
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
        };

        menu.validate()?;
        Ok(menu)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.modified_at = Some(Utc::now());
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.modified_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_menu() {
        let menu = Menu::new(
            "Dashboard".to_string(),
            Some("home".to_string()),
            Some("/dashboard".to_string()),
            None,
            None,
            1,
        );
        assert!(menu.is_ok());
        let menu = menu.unwrap();
        assert!(menu.is_root());
        assert!(menu.is_active);
    }

    #[test]
    fn test_empty_name_rejected() {
        let menu = Menu::new("   ".to_string(), None, None, None, None, 1);
        assert!(menu.is_err());
    }

    #[test]
    fn test_deactivate_menu() {
        let mut menu = Menu::new("Reports".to_string(), None, None, None, None, 2).unwrap();
        menu.deactivate();
        assert!(!menu.is_active);
        assert!(menu.modified_at.is_some());
    }
}
