// ============================================================================
// Backoffice Core - Permission Entity
// File: crates/backoffice-core/src/domain/permission.rs
// Description: Capability triple a role holds over a menu entry
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single capability over a menu entry.
///
/// Each capability is evaluated independently; edit/delete are never implied
/// by view or by each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    View,
    Edit,
    Delete,
}

/// Optional capability flags for partial upserts.
///
/// `None` means "leave unchanged" on update and "default to false" on create.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PermissionFlags {
    pub can_view: Option<bool>,
    pub can_edit: Option<bool>,
    pub can_delete: Option<bool>,
}

impl PermissionFlags {
    pub fn is_empty(&self) -> bool {
        self.can_view.is_none() && self.can_edit.is_none() && self.can_delete.is_none()
    }

    pub fn apply_to(&self, permission: &mut Permission) {
        if let Some(can_view) = self.can_view {
            permission.can_view = can_view;
        }
        if let Some(can_edit) = self.can_edit {
            permission.can_edit = can_edit;
        }
        if let Some(can_delete) = self.can_delete {
            permission.can_delete = can_delete;
        }
    }
}

/// Permission entity (role-menu capability record)
///
/// Identity is the (role_id, menu_id) pair; at most one record exists per
/// pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    pub role_id: Uuid,
    pub menu_id: Uuid,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl Permission {
    pub fn new(role_id: Uuid, menu_id: Uuid, flags: PermissionFlags) -> Self {
        Self {
            id: Uuid::new_v4(),
            role_id,
            menu_id,
            can_view: flags.can_view.unwrap_or(false),
            can_edit: flags.can_edit.unwrap_or(false),
            can_delete: flags.can_delete.unwrap_or(false),
        }
    }

    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.can_view,
            Capability::Edit => self.can_edit,
            Capability::Delete => self.can_delete,
        }
    }

    pub fn grants_any(&self) -> bool {
        self.can_view || self.can_edit || self.can_delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspecified_flags_default_to_false() {
        let permission = Permission::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            PermissionFlags {
                can_view: Some(true),
                ..Default::default()
            },
        );
        assert!(permission.can_view);
        assert!(!permission.can_edit);
        assert!(!permission.can_delete);
    }

    #[test]
    fn test_apply_only_provided_flags() {
        let mut permission = Permission::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            PermissionFlags {
                can_view: Some(true),
                can_edit: Some(true),
                can_delete: None,
            },
        );
        let update = PermissionFlags {
            can_edit: Some(false),
            ..Default::default()
        };
        update.apply_to(&mut permission);
        assert!(permission.can_view);
        assert!(!permission.can_edit);
        assert!(!permission.can_delete);
    }

    #[test]
    fn test_capabilities_are_independent() {
        let permission = Permission::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            PermissionFlags {
                can_edit: Some(true),
                ..Default::default()
            },
        );
        assert!(!permission.grants(Capability::View));
        assert!(permission.grants(Capability::Edit));
        assert!(!permission.grants(Capability::Delete));
        assert!(permission.grants_any());
    }
}
