// ============================================================================
// Backoffice Core - Area Entity
// File: crates/backoffice-core/src/domain/area.rs
// Description: Administrative grouping that owns menu entries
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Area entity
///
/// Deactivation is a flag flip only; menus owned by the area keep their own
/// lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Area {
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Area name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Area description too long"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "Area icon too long"))]
    pub icon: Option<String>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Area {
    pub fn new(
        name: String,
        description: Option<String>,
        icon: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let area = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            icon: icon.map(|i| i.trim().to_string()),
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
        };

        area.validate()?;
        Ok(area)
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.modified_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_area() {
        let area = Area::new(
            "Administration".to_string(),
            Some("Back office administration".to_string()),
            Some("settings".to_string()),
        );
        assert!(area.is_ok());
        assert!(area.unwrap().is_active);
    }

    #[test]
    fn test_toggle_area() {
        let mut area = Area::new("Production".to_string(), None, None).unwrap();
        area.set_active(false);
        assert!(!area.is_active);
        area.set_active(true);
        assert!(area.is_active);
    }
}
