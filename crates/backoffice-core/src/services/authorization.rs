// ============================================================================
// Backoffice Core - Authorization Service
// File: crates/backoffice-core/src/services/authorization.rs
// ============================================================================
//! Resolves a principal's roles and computes menu visibility.
//!
//! Nothing here is cached: every check re-resolves from the repositories so
//! that role and permission changes take effect immediately.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use crate::domain::{effective_roles, menu_tree, Capability, MenuNode, Role};
use crate::error::DomainError;
use crate::repositories::{MenuRepository, PermissionRepository, UserRepository};

pub struct AuthorizationService<U, M, P>
where
    U: UserRepository,
    M: MenuRepository,
    P: PermissionRepository,
{
    user_repo: Arc<U>,
    menu_repo: Arc<M>,
    permission_repo: Arc<P>,
}

impl<U, M, P> AuthorizationService<U, M, P>
where
    U: UserRepository,
    M: MenuRepository,
    P: PermissionRepository,
{
    pub fn new(user_repo: Arc<U>, menu_repo: Arc<M>, permission_repo: Arc<P>) -> Self {
        Self {
            user_repo,
            menu_repo,
            permission_repo,
        }
    }

    /// Roles that count for authorization: the role AND its assignment must
    /// both be active. An unknown principal resolves to no roles, not an
    /// error.
    pub async fn resolve_roles(&self, user_id: &Uuid) -> Result<Vec<Role>, DomainError> {
        let assignments = self.user_repo.find_assignments(user_id).await?;
        Ok(effective_roles(assignments))
    }

    pub async fn resolve_role_names(&self, user_id: &Uuid) -> Result<HashSet<String>, DomainError> {
        Ok(self
            .resolve_roles(user_id)
            .await?
            .into_iter()
            .map(|role| role.name)
            .collect())
    }

    /// Menu ids for which any held role grants the capability. Capabilities
    /// are ORed across roles and evaluated independently of each other.
    pub async fn granted_menu_ids(
        &self,
        user_id: &Uuid,
        capability: Capability,
    ) -> Result<HashSet<Uuid>, DomainError> {
        let roles = self.resolve_roles(user_id).await?;
        let mut granted = HashSet::new();
        for role in &roles {
            for permission in self.permission_repo.list_for_role(&role.id).await? {
                if permission.grants(capability) {
                    granted.insert(permission.menu_id);
                }
            }
        }
        Ok(granted)
    }

    pub async fn has_capability(
        &self,
        user_id: &Uuid,
        menu_id: &Uuid,
        capability: Capability,
    ) -> Result<bool, DomainError> {
        Ok(self
            .granted_menu_ids(user_id, capability)
            .await?
            .contains(menu_id))
    }

    /// The navigation tree the principal may see: active menus, built into a
    /// forest, pruned to the view grants. A pruned parent always hides its
    /// subtree. A principal with no effective roles gets an empty forest.
    pub async fn menu_tree_for_user(&self, user_id: &Uuid) -> Result<Vec<MenuNode>, DomainError> {
        let menus = self.menu_repo.list_all().await?;
        let known: HashSet<Uuid> = menus.iter().map(|m| m.id).collect();
        let active: HashSet<Uuid> = menus
            .iter()
            .filter(|m| m.is_active)
            .map(|m| m.id)
            .collect();

        let granted = self.granted_menu_ids(user_id, Capability::View).await?;
        let mut visible = HashSet::new();
        for menu_id in granted {
            if !known.contains(&menu_id) {
                warn!(%menu_id, "permission references a menu that does not exist, ignoring");
            } else if active.contains(&menu_id) {
                visible.insert(menu_id);
            }
        }

        let tree = menu_tree::build_tree(menus);
        Ok(menu_tree::filter_tree(tree, &visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::{Menu, Permission, PermissionFlags, RoleAssignment};
    use crate::repositories::{MockMenuRepository, MockPermissionRepository, MockUserRepository};

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn menu(id: u128, parent: Option<u128>, name: &str, active: bool) -> Menu {
        Menu {
            id: uid(id),
            area_id: None,
            parent_id: parent.map(uid),
            name: name.to_string(),
            icon: None,
            path: None,
            sort_order: 1,
            is_active: active,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    fn role(id: u128, name: &str, active: bool) -> Role {
        Role {
            id: uid(id),
            name: name.to_string(),
            description: None,
            is_active: active,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    fn assignment(user_id: &Uuid, role: &Role, active: bool) -> (RoleAssignment, Role) {
        let mut a = RoleAssignment::new(*user_id, role.id);
        a.is_active = active;
        (a, role.clone())
    }

    fn view_permission(role_id: u128, menu_id: u128, can_view: bool) -> Permission {
        Permission::new(
            uid(role_id),
            uid(menu_id),
            PermissionFlags {
                can_view: Some(can_view),
                ..Default::default()
            },
        )
    }

    fn service(
        user_repo: MockUserRepository,
        menu_repo: MockMenuRepository,
        permission_repo: MockPermissionRepository,
    ) -> AuthorizationService<MockUserRepository, MockMenuRepository, MockPermissionRepository>
    {
        AuthorizationService::new(
            Arc::new(user_repo),
            Arc::new(menu_repo),
            Arc::new(permission_repo),
        )
    }

    #[tokio::test]
    async fn test_view_is_ored_across_roles() {
        let user_id = uid(100);
        let role_a = role(1, "Operator", true);
        let role_b = role(2, "Supervisor", true);

        let mut user_repo = MockUserRepository::new();
        let assignments = vec![
            assignment(&user_id, &role_a, true),
            assignment(&user_id, &role_b, true),
        ];
        user_repo
            .expect_find_assignments()
            .returning(move |_| Ok(assignments.clone()));

        let mut menu_repo = MockMenuRepository::new();
        menu_repo
            .expect_list_all()
            .returning(|| Ok(vec![menu(10, None, "Reports", true)]));

        let mut permission_repo = MockPermissionRepository::new();
        permission_repo.expect_list_for_role().returning(move |role_id| {
            if *role_id == uid(1) {
                Ok(vec![view_permission(1, 10, false)])
            } else {
                Ok(vec![view_permission(2, 10, true)])
            }
        });

        let service = service(user_repo, menu_repo, permission_repo);
        let tree = service.menu_tree_for_user(&user_id).await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, uid(10));
    }

    #[tokio::test]
    async fn test_inactive_role_grants_nothing() {
        let user_id = uid(100);
        let inactive = role(1, "Supervisor", false);

        let mut user_repo = MockUserRepository::new();
        let assignments = vec![assignment(&user_id, &inactive, true)];
        user_repo
            .expect_find_assignments()
            .returning(move |_| Ok(assignments.clone()));

        let mut menu_repo = MockMenuRepository::new();
        menu_repo
            .expect_list_all()
            .returning(|| Ok(vec![menu(10, None, "Reports", true)]));

        let permission_repo = MockPermissionRepository::new();

        let service = service(user_repo, menu_repo, permission_repo);
        assert!(service.resolve_role_names(&user_id).await.unwrap().is_empty());
        assert!(service.menu_tree_for_user(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_inactive_assignment_grants_nothing() {
        let user_id = uid(100);
        let active_role = role(1, "Supervisor", true);

        let mut user_repo = MockUserRepository::new();
        let assignments = vec![assignment(&user_id, &active_role, false)];
        user_repo
            .expect_find_assignments()
            .returning(move |_| Ok(assignments.clone()));

        let mut menu_repo = MockMenuRepository::new();
        menu_repo
            .expect_list_all()
            .returning(|| Ok(vec![menu(10, None, "Reports", true)]));

        let permission_repo = MockPermissionRepository::new();

        let service = service(user_repo, menu_repo, permission_repo);
        assert!(service.menu_tree_for_user(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_principal_sees_empty_tree() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_assignments().returning(|_| Ok(vec![]));

        let mut menu_repo = MockMenuRepository::new();
        menu_repo
            .expect_list_all()
            .returning(|| Ok(vec![menu(10, None, "Reports", true)]));

        let service = service(user_repo, menu_repo, MockPermissionRepository::new());
        let tree = service.menu_tree_for_user(&uid(999)).await.unwrap();
        assert!(tree.is_empty());
    }

    #[tokio::test]
    async fn test_dangling_permission_is_ignored() {
        let user_id = uid(100);
        let r = role(1, "Operator", true);

        let mut user_repo = MockUserRepository::new();
        let assignments = vec![assignment(&user_id, &r, true)];
        user_repo
            .expect_find_assignments()
            .returning(move |_| Ok(assignments.clone()));

        let mut menu_repo = MockMenuRepository::new();
        menu_repo
            .expect_list_all()
            .returning(|| Ok(vec![menu(10, None, "Reports", true)]));

        let mut permission_repo = MockPermissionRepository::new();
        permission_repo.expect_list_for_role().returning(|_| {
            Ok(vec![
                view_permission(1, 10, true),
                // references a menu id that no longer exists
                view_permission(1, 9999, true),
            ])
        });

        let service = service(user_repo, menu_repo, permission_repo);
        let tree = service.menu_tree_for_user(&user_id).await.unwrap();
        assert_eq!(menu_tree::flatten_ids(&tree), vec![uid(10)]);
    }

    #[tokio::test]
    async fn test_granted_but_inactive_menu_is_hidden() {
        let user_id = uid(100);
        let r = role(1, "Operator", true);

        let mut user_repo = MockUserRepository::new();
        let assignments = vec![assignment(&user_id, &r, true)];
        user_repo
            .expect_find_assignments()
            .returning(move |_| Ok(assignments.clone()));

        let mut menu_repo = MockMenuRepository::new();
        menu_repo.expect_list_all().returning(|| {
            Ok(vec![
                menu(10, None, "Reports", false),
                menu(11, Some(10), "Daily", true),
            ])
        });

        let mut permission_repo = MockPermissionRepository::new();
        permission_repo
            .expect_list_for_role()
            .returning(|_| Ok(vec![view_permission(1, 10, true), view_permission(1, 11, true)]));

        let service = service(user_repo, menu_repo, permission_repo);
        // the inactive parent hides itself and its granted child
        assert!(service.menu_tree_for_user(&user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capabilities_evaluated_independently() {
        let user_id = uid(100);
        let r = role(1, "Operator", true);

        let mut user_repo = MockUserRepository::new();
        let assignments = vec![assignment(&user_id, &r, true)];
        user_repo
            .expect_find_assignments()
            .returning(move |_| Ok(assignments.clone()));

        let mut permission_repo = MockPermissionRepository::new();
        permission_repo.expect_list_for_role().returning(|_| {
            Ok(vec![Permission::new(
                uid(1),
                uid(10),
                PermissionFlags {
                    can_view: Some(false),
                    can_edit: Some(true),
                    can_delete: None,
                },
            )])
        });

        let service = service(user_repo, MockMenuRepository::new(), permission_repo);
        assert!(!service
            .has_capability(&user_id, &uid(10), Capability::View)
            .await
            .unwrap());
        assert!(service
            .has_capability(&user_id, &uid(10), Capability::Edit)
            .await
            .unwrap());
        assert!(!service
            .has_capability(&user_id, &uid(10), Capability::Delete)
            .await
            .unwrap());
    }
}
