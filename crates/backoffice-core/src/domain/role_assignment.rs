// ============================================================================
// Backoffice Core - Role Assignment Entity
// File: crates/backoffice-core/src/domain/role_assignment.rs
// Description: User-Role assignment (activatable join)
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Role;

/// Role assignment entity (User-Role join)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    pub is_active: bool,
    pub assigned_at: DateTime<Utc>,
}

impl RoleAssignment {
    pub fn new(user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            role_id,
            is_active: true,
            assigned_at: Utc::now(),
        }
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Reactivating stamps a fresh assignment date.
    pub fn reactivate(&mut self) {
        self.is_active = true;
        self.assigned_at = Utc::now();
    }
}

/// A role counts toward a principal only when the role itself AND the
/// assignment are both active. Output is sorted by role name.
pub fn effective_roles(assignments: Vec<(RoleAssignment, Role)>) -> Vec<Role> {
    let mut roles: Vec<Role> = assignments
        .into_iter()
        .filter(|(assignment, role)| assignment.is_active && role.is_active)
        .map(|(_, role)| role)
        .collect();
    roles.sort_by(|a, b| a.name.cmp(&b.name));
    roles
}
