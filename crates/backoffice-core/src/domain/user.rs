// ============================================================================
// Backoffice Core - User Entity
// File: crates/backoffice-core/src/domain/user.rs
// Description: Authenticatable principal
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,

    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    #[validate(length(max = 100, message = "First name too long"))]
    pub first_name: Option<String>,

    #[validate(length(max = 100, message = "Last name too long"))]
    pub last_name: Option<String>,

    pub is_active: bool,
    pub email_verified: bool,
    pub is_deleted: bool,

    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        password_hash: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            first_name: first_name.map(|n| n.trim().to_string()),
            last_name: last_name.map(|n| n.trim().to_string()),
            is_active: true,
            email_verified: false,
            is_deleted: false,
            last_login_at: None,
            created_at: Utc::now(),
            modified_at: None,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_deleted
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    /// Logical deletion; the row is never removed physically.
    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.is_active = false;
        self.modified_at = Some(Utc::now());
    }

    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(f), None) => f.clone(),
            (None, Some(l)) => l.clone(),
            _ => self.username.clone(),
        }
    }
}
