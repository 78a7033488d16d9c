// ============================================================================
// Backoffice Core - Menu Tree
// File: crates/backoffice-core/src/domain/menu_tree.rs
// Description: Nesting of flat menu rows and per-principal pruning
// ============================================================================
//! Pure tree construction: no I/O, deterministic output.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::domain::Menu;

/// A nested menu entry as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub is_active: bool,
    pub area_id: Option<Uuid>,
    pub children: Vec<MenuNode>,
}

impl From<&Menu> for MenuNode {
    fn from(menu: &Menu) -> Self {
        Self {
            id: menu.id,
            name: menu.name.clone(),
            icon: menu.icon.clone(),
            path: menu.path.clone(),
            sort_order: menu.sort_order,
            is_active: menu.is_active,
            area_id: menu.area_id,
            children: Vec::new(),
        }
    }
}

/// Build a forest from flat menu rows.
///
/// Two passes: every row is first indexed into an id -> node arena, then each
/// row is linked under its parent or collected as a root. Rows whose
/// `parent_id` does not resolve within the input are kept as roots and logged,
/// never dropped. Roots and every children list are sorted by
/// `(sort_order, name)`, so the result does not depend on map iteration
/// order or on the order of the input rows.
pub fn build_tree(rows: Vec<Menu>) -> Vec<MenuNode> {
    let known: HashSet<Uuid> = rows.iter().map(|m| m.id).collect();

    let mut arena: HashMap<Uuid, MenuNode> = HashMap::with_capacity(rows.len());
    let mut children_of: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut root_ids: Vec<Uuid> = Vec::new();

    for row in &rows {
        arena.insert(row.id, MenuNode::from(row));
        match row.parent_id {
            None => root_ids.push(row.id),
            Some(parent_id) if parent_id != row.id && known.contains(&parent_id) => {
                children_of.entry(parent_id).or_default().push(row.id);
            }
            Some(parent_id) => {
                warn!(
                    menu_id = %row.id,
                    parent_id = %parent_id,
                    "menu row has an unresolvable parent, keeping it as a root"
                );
                root_ids.push(row.id);
            }
        }
    }

    let mut roots: Vec<MenuNode> = root_ids
        .iter()
        .filter_map(|id| assemble(id, &mut arena, &children_of))
        .collect();

    // Rows trapped in a parent cycle are unreachable from any root; keep
    // them as roots as well rather than losing them.
    if !arena.is_empty() {
        let mut leftover: Vec<Uuid> = arena.keys().copied().collect();
        leftover.sort();
        for id in leftover {
            if let Some(node) = assemble(&id, &mut arena, &children_of) {
                warn!(menu_id = %node.id, "menu row unreachable from any root, keeping it as a root");
                roots.push(node);
            }
        }
    }

    sort_siblings(&mut roots);
    roots
}

fn assemble(
    id: &Uuid,
    arena: &mut HashMap<Uuid, MenuNode>,
    children_of: &HashMap<Uuid, Vec<Uuid>>,
) -> Option<MenuNode> {
    let mut node = arena.remove(id)?;
    if let Some(child_ids) = children_of.get(id) {
        node.children = child_ids
            .iter()
            .filter_map(|child_id| assemble(child_id, arena, children_of))
            .collect();
        sort_siblings(&mut node.children);
    }
    Some(node)
}

fn sort_siblings(nodes: &mut [MenuNode]) {
    nodes.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Prune a forest to the nodes whose id is in `granted`.
///
/// Removing a node removes its entire subtree: a hidden parent always hides
/// its children.
pub fn filter_tree(nodes: Vec<MenuNode>, granted: &HashSet<Uuid>) -> Vec<MenuNode> {
    nodes
        .into_iter()
        .filter(|node| granted.contains(&node.id))
        .map(|mut node| {
            node.children = filter_tree(std::mem::take(&mut node.children), granted);
            node
        })
        .collect()
}

/// Pre-order traversal of all node ids in a forest.
pub fn flatten_ids(nodes: &[MenuNode]) -> Vec<Uuid> {
    fn walk(nodes: &[MenuNode], ids: &mut Vec<Uuid>) {
        for node in nodes {
            ids.push(node.id);
            walk(&node.children, ids);
        }
    }

    let mut ids = Vec::new();
    walk(nodes, &mut ids);
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn menu(id: u128, parent: Option<u128>, sort_order: i32, name: &str) -> Menu {
        Menu {
            id: uid(id),
            area_id: None,
            parent_id: parent.map(uid),
            name: name.to_string(),
            icon: None,
            path: None,
            sort_order,
            is_active: true,
            created_at: Utc::now(),
            modified_at: None,
        }
    }

    #[test]
    fn test_single_root_with_ordered_children() {
        let rows = vec![
            menu(1, None, 1, "Admin"),
            menu(2, Some(1), 1, "Users"),
            menu(3, Some(1), 2, "Roles"),
        ];
        let tree = build_tree(rows);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, uid(1));
        let children: Vec<Uuid> = tree[0].children.iter().map(|c| c.id).collect();
        assert_eq!(children, vec![uid(2), uid(3)]);
    }

    #[test]
    fn test_siblings_sorted_by_order() {
        let rows = vec![
            menu(1, None, 1, "Root"),
            menu(2, Some(1), 3, "Third"),
            menu(3, Some(1), 1, "First"),
            menu(4, Some(1), 2, "Second"),
        ];
        let tree = build_tree(rows);
        let orders: Vec<i32> = tree[0].children.iter().map(|c| c.sort_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn test_order_ties_broken_by_name() {
        let rows = vec![
            menu(1, None, 1, "Root"),
            menu(2, Some(1), 1, "Zeta"),
            menu(3, Some(1), 1, "Alpha"),
        ];
        let tree = build_tree(rows);
        let names: Vec<&str> = tree[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_orphan_is_kept_as_root() {
        let rows = vec![menu(1, None, 1, "Root"), menu(2, Some(99), 1, "Orphan")];
        let tree = build_tree(rows);
        assert_eq!(tree.len(), 2);
        let ids: HashSet<Uuid> = tree.iter().map(|n| n.id).collect();
        assert!(ids.contains(&uid(2)));
    }

    #[test]
    fn test_self_parent_is_kept_as_root() {
        let rows = vec![menu(1, Some(1), 1, "Loop")];
        let tree = build_tree(rows);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_parent_cycle_rows_are_not_lost() {
        let rows = vec![menu(1, Some(2), 1, "A"), menu(2, Some(1), 1, "B")];
        let tree = build_tree(rows);
        let mut ids = flatten_ids(&tree);
        ids.sort();
        assert_eq!(ids, vec![uid(1), uid(2)]);
    }

    #[test]
    fn test_flatten_roundtrip_preserves_id_set() {
        let rows = vec![
            menu(1, None, 2, "Operations"),
            menu(2, None, 1, "Admin"),
            menu(3, Some(1), 1, "Cutting"),
            menu(4, Some(1), 2, "Sewing"),
            menu(5, Some(3), 1, "Daily"),
            menu(6, Some(2), 1, "Users"),
        ];
        let input_ids: HashSet<Uuid> = rows.iter().map(|m| m.id).collect();
        let flat = flatten_ids(&build_tree(rows));
        assert_eq!(flat.len(), input_ids.len());
        assert_eq!(flat.into_iter().collect::<HashSet<_>>(), input_ids);
    }

    #[test]
    fn test_deterministic_regardless_of_input_order() {
        let rows = vec![
            menu(1, None, 1, "Admin"),
            menu(2, Some(1), 2, "Roles"),
            menu(3, Some(1), 1, "Users"),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();
        assert_eq!(build_tree(rows), build_tree(reversed));
    }

    #[test]
    fn test_filter_prunes_whole_subtree() {
        let rows = vec![
            menu(1, None, 1, "Admin"),
            menu(2, Some(1), 1, "Users"),
            menu(3, Some(2), 1, "Detail"),
            menu(4, None, 2, "Reports"),
        ];
        let tree = build_tree(rows);
        // node 3 is granted but its parent chain is not
        let granted: HashSet<Uuid> = [uid(3), uid(4)].into_iter().collect();
        let filtered = filter_tree(tree, &granted);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, uid(4));
    }

    #[test]
    fn test_filter_keeps_granted_chain() {
        let rows = vec![
            menu(1, None, 1, "Admin"),
            menu(2, Some(1), 1, "Users"),
            menu(3, Some(1), 2, "Roles"),
        ];
        let tree = build_tree(rows);
        let granted: HashSet<Uuid> = [uid(1), uid(2)].into_iter().collect();
        let filtered = filter_tree(tree, &granted);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].children.len(), 1);
        assert_eq!(filtered[0].children[0].id, uid(2));
    }

    #[test]
    fn test_node_wire_shape() {
        let rows = vec![menu(1, None, 7, "Admin"), menu(2, Some(1), 1, "Users")];
        let tree = build_tree(rows);
        let value = serde_json::to_value(&tree[0]).unwrap();
        assert_eq!(value["order"], 7);
        assert!(value["children"].is_array());
        assert!(value.get("sort_order").is_none());
        assert_eq!(value["children"][0]["name"], "Users");
    }
}
