// ============================================================================
// Backoffice Core - Role Entity
// File: crates/backoffice-core/src/domain/role.rs
// Description: Role entity for RBAC
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Role entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Role {
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Role name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 255, message = "Role description too long"))]
    pub description: Option<String>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Role {
    pub fn new(name: String, description: Option<String>) -> Result<Self, validator::ValidationErrors> {
        let role = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
        };

        role.validate()?;
        Ok(role)
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
