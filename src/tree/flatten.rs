//! Tree Utilities
//!
//! Helper functions for tree rendering.

use serde::Serialize;

use super::CategoryTree;
use crate::domain::{NodeId, ROOT_ID};

/// One rendered row of the tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleRow {
    pub id: NodeId,
    pub parent_id: NodeId,
    pub depth: u8,
    pub ordinal: u32,
    pub name: String,
    pub has_children: bool,
    pub collapsed: bool,
}

/// Render categories as indented rows using recursive DFS.
/// Children of collapsed nodes are skipped; the root itself is never a row.
pub fn flatten_visible(tree: &CategoryTree) -> Vec<VisibleRow> {
    fn collect(tree: &CategoryTree, parent_id: NodeId, result: &mut Vec<VisibleRow>) {
        for node in tree.children_of(parent_id) {
            result.push(VisibleRow {
                id: node.id,
                parent_id,
                depth: node.depth,
                ordinal: node.ordinal,
                name: node.name.clone(),
                has_children: node.has_children(),
                collapsed: node.collapsed,
            });
            // If not collapsed, add its children
            if !node.collapsed {
                collect(tree, node.id, result);
            }
        }
    }

    let mut result = Vec::with_capacity(tree.len());
    collect(tree, ROOT_ID, &mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::super::build;
    use super::super::test_support::rec;
    use super::*;

    #[test]
    fn test_flatten_tree() {
        let tree = build(&[
            rec(1, vec![rec(3, vec![rec(5, vec![])]), rec(4, vec![])]),
            rec(2, vec![]),
        ]);

        let rows = flatten_visible(&tree);

        // Should be: 1 (depth 1), 3 (depth 2), 5 (depth 3), 4 (depth 2), 2 (depth 1)
        let shape: Vec<_> = rows.iter().map(|r| (r.id, r.depth)).collect();
        assert_eq!(shape, vec![(1, 1), (3, 2), (5, 3), (4, 2), (2, 1)]);
        assert!(rows[0].has_children);
        assert_eq!(rows[3].parent_id, 1);
        assert_eq!(rows[4].parent_id, ROOT_ID);
    }

    #[test]
    fn collapsed_children_are_hidden() {
        let mut tree = build(&[rec(1, vec![rec(3, vec![rec(5, vec![])])]), rec(2, vec![])]);
        tree.set_collapsed(3, true);
        let ids: Vec<_> = flatten_visible(&tree).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);

        tree.set_collapsed(1, true);
        let ids: Vec<_> = flatten_visible(&tree).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
