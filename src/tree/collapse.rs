//! Collapse-State Reconciler
//!
//! Carries expand/collapse flags across a full rebuild, keyed by id.

use super::CategoryTree;

/// Copy each node's `collapsed` flag from `previous` when the id existed
/// there, default to expanded otherwise. Position is irrelevant: a node that
/// moved to another parent keeps its flag.
pub fn reconcile(mut fresh: CategoryTree, previous: &CategoryTree) -> CategoryTree {
    let ids: Vec<_> = fresh.ids().collect();
    for id in ids {
        let collapsed = previous.get(id).is_some_and(|old| old.collapsed);
        fresh.set_collapsed(id, collapsed);
    }
    fresh
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{dump, rec};
    use super::super::build;
    use super::*;

    #[test]
    fn flags_follow_ids() {
        let mut previous = build(&[rec(1, vec![rec(2, vec![])]), rec(3, vec![])]);
        previous.set_collapsed(1, true);

        let fresh = build(&[rec(1, vec![rec(2, vec![])]), rec(3, vec![]), rec(4, vec![])]);
        let tree = reconcile(fresh, &previous);
        assert_eq!(dump(&tree), "1#1 +\n  2#1\n3#2\n4#3");
    }

    #[test]
    fn moved_node_keeps_its_flag() {
        let mut previous = build(&[rec(1, vec![rec(2, vec![rec(5, vec![])])]), rec(3, vec![])]);
        previous.set_collapsed(2, true);

        // 2 moved under 3
        let fresh = build(&[rec(1, vec![]), rec(3, vec![rec(2, vec![rec(5, vec![])])])]);
        let tree = reconcile(fresh, &previous);
        assert!(tree.is_collapsed(2));
        assert_eq!(tree.parent_of(2).map(|p| p.id), Some(3));
    }

    #[test]
    fn empty_previous_expands_everything() {
        let tree = reconcile(build(&[rec(1, vec![rec(2, vec![])])]), &CategoryTree::empty());
        assert!(tree.nodes().all(|n| !n.collapsed));
    }

    #[test]
    fn rebuilding_twice_is_idempotent() {
        let snapshot = vec![rec(1, vec![rec(2, vec![]), rec(3, vec![])]), rec(4, vec![])];
        let mut shown = reconcile(build(&snapshot), &CategoryTree::empty());
        shown.set_collapsed(1, true);
        shown.set_collapsed(4, true);

        let first = reconcile(build(&snapshot), &shown);
        let second = reconcile(build(&snapshot), &first);
        for id in first.ids() {
            assert_eq!(first.is_collapsed(id), second.is_collapsed(id), "id {}", id);
        }
        assert_eq!(first, second);
    }

    #[test]
    fn stale_flags_do_not_leak_into_new_nodes() {
        let mut previous = build(&[rec(1, vec![])]);
        previous.collapse_all();
        let tree = reconcile(build(&[rec(1, vec![]), rec(2, vec![])]), &previous);
        assert!(tree.is_collapsed(1));
        assert!(!tree.is_collapsed(2));
    }
}
