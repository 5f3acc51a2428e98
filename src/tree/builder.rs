//! Tree Builder
//!
//! Backend records → depth-stamped arena under the synthetic root.

use std::collections::HashMap;

use super::CategoryTree;
use crate::domain::{CategoryNode, NodeId, MAX_DEPTH, ROOT_ID, TOP_LEVEL_DEPTH};
use crate::models::CategoryRecord;

/// Build a fresh tree from a backend response.
///
/// Depths and ordinals are recomputed from position. Nested `children`
/// lists are authoritative; upstream depth is only consulted to hang a flat,
/// depth-tagged top-level entry under the closest preceding node one level
/// up. Records with unusable or repeated ids, orphans of a flat list and
/// anything that would land below [`MAX_DEPTH`] are dropped together with
/// their subtree. All nodes start expanded; see [`super::reconcile`].
pub fn build(records: &[CategoryRecord]) -> CategoryTree {
    let mut tree = CategoryTree::empty();
    // Last node placed at each depth, for flat depth-tagged lists
    let mut last_at_depth: HashMap<u8, NodeId> = HashMap::new();

    for record in records {
        let claimed = record.depth.unwrap_or(i64::from(TOP_LEVEL_DEPTH));
        let parent = if claimed <= i64::from(TOP_LEVEL_DEPTH) {
            Some(ROOT_ID)
        } else if claimed > i64::from(MAX_DEPTH) {
            None
        } else {
            // In range 2..=MAX_DEPTH here
            let parent_depth = claimed as u8 - 1;
            last_at_depth.get(&parent_depth).copied()
        };

        let Some(parent) = parent else {
            log::warn!(
                "dropping category {:?}: no parent at depth {}",
                record.id,
                claimed - 1
            );
            continue;
        };

        insert(&mut tree, record, parent, &mut last_at_depth);
    }

    log::debug!("built category tree with {} nodes", tree.len());
    tree
}

/// Insert `record` and its nested children under `parent`, registering
/// every placed node in `last_at_depth` in pre-order
fn insert(
    tree: &mut CategoryTree,
    record: &CategoryRecord,
    parent: NodeId,
    last_at_depth: &mut HashMap<u8, NodeId>,
) -> Option<NodeId> {
    let Some(id) = record.id.as_node_id() else {
        log::warn!("dropping category with unusable id {:?}", record.id);
        return None;
    };
    if tree.contains(id) {
        log::warn!("dropping duplicate category id {}", id);
        return None;
    }
    let (depth, ordinal) = {
        let parent_node = tree.get(parent)?;
        (parent_node.depth + 1, parent_node.children.len() as u32 + 1)
    };
    if depth > MAX_DEPTH {
        log::warn!("dropping category {}: depth {} exceeds {}", id, depth, MAX_DEPTH);
        return None;
    }

    let mut node = CategoryNode::new(id, record.name.clone(), parent, depth, ordinal);
    node.visible = record.visible;
    node.banner = record.banner.clone();
    node.content_type = record.content_type.clone();
    if !tree.attach(node) {
        return None;
    }
    last_at_depth.insert(depth, id);
    // A new node at this depth ends every deeper chain
    last_at_depth.retain(|d, _| *d <= depth);

    for child in record.children.iter().flatten() {
        insert(tree, child, id, last_at_depth);
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{dump, rec};
    use super::*;
    use crate::models::RawId;

    #[test]
    fn builds_nested_response() {
        let tree = build(&[
            rec(1, vec![rec(3, vec![]), rec(4, vec![rec(7, vec![])])]),
            rec(2, vec![]),
        ]);
        assert_eq!(dump(&tree), "1#1\n  3#1\n  4#2\n    7#1\n2#2");
        assert!(tree.validate().is_ok());
        assert_eq!(tree.get(7).unwrap().depth, 3);
        assert_eq!(tree.root().depth, 0);
    }

    #[test]
    fn upstream_depth_of_nested_entries_is_ignored() {
        let tree = build(&[rec(1, vec![rec(2, vec![]).with_depth(4)]).with_depth(1)]);
        assert_eq!(tree.get(1).unwrap().depth, 1);
        assert_eq!(tree.get(2).unwrap().depth, 2);
    }

    #[test]
    fn flat_depth_tagged_list_is_nested() {
        let tree = build(&[
            rec(1, vec![]).with_depth(1),
            rec(2, vec![]).with_depth(2),
            rec(3, vec![]).with_depth(3),
            rec(4, vec![]).with_depth(2),
            rec(5, vec![]).with_depth(1),
            rec(6, vec![]).with_depth(2),
        ]);
        assert_eq!(dump(&tree), "1#1\n  2#1\n    3#1\n  4#2\n5#2\n  6#1");
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn flat_entries_continue_under_nested_children() {
        let tree = build(&[
            rec(1, vec![rec(2, vec![rec(5, vec![])]), rec(6, vec![])]).with_depth(1),
            rec(3, vec![]).with_depth(3),
            rec(4, vec![]).with_depth(4),
        ]);
        // 6 closed the chain through 5, so 3 lands under 6 and 4 under 3
        assert_eq!(dump(&tree), "1#1\n  2#1\n    5#1\n  6#2\n    3#1\n      4#1");
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn flat_orphans_are_dropped() {
        let tree = build(&[
            rec(1, vec![]).with_depth(3),
            rec(2, vec![]).with_depth(1),
            rec(3, vec![]).with_depth(2),
            // depth 3 chain ended when 4 took depth 1
            rec(4, vec![]).with_depth(1),
            rec(5, vec![]).with_depth(3),
            rec(6, vec![]).with_depth(9),
        ]);
        assert_eq!(dump(&tree), "2#1\n  3#1\n4#2");
    }

    #[test]
    fn bad_and_duplicate_ids_are_discarded() {
        let mut bad = rec(9, vec![rec(10, vec![])]);
        bad.id = RawId::Text("nine".to_string());
        let tree = build(&[rec(1, vec![rec(2, vec![])]), bad, rec(2, vec![]), rec(3, vec![])]);
        assert_eq!(dump(&tree), "1#1\n  2#1\n3#2");
        assert!(!tree.contains(10));
    }

    #[test]
    fn levels_below_ceiling_are_cut() {
        let tree = build(&[rec(
            1,
            vec![rec(2, vec![rec(3, vec![rec(4, vec![rec(5, vec![])])])])],
        )]);
        assert!(tree.contains(4));
        assert!(!tree.contains(5));
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn empty_input_gives_empty_tree() {
        let tree = build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.root().children.len(), 0);
    }

    #[test]
    fn input_is_not_mutated() {
        let records = vec![rec(1, vec![rec(2, vec![])])];
        let before = records.clone();
        let _ = build(&records);
        assert_eq!(records, before);
    }
}
