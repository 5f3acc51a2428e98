//! Category Tree
//!
//! Arena of category nodes keyed by id, rooted under a synthetic root.
//!
//! Every node carries its `parent_id` and ordered child ids, so identity
//! lookups are a map hit and ancestry is a walk up `parent_id`. Nested and
//! flattened views for the interaction surface are produced by depth-first
//! walks over the child lists.

mod builder;
mod collapse;
mod flatten;
mod reorder;
mod rules;

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Acceptance, CategoryNode, DomainError, DomainResult, NodeId, MAX_DEPTH, ROOT_ID};

pub use builder::build;
pub use collapse::reconcile;
pub use flatten::{flatten_visible, VisibleRow};
pub use reorder::{apply_drop, slot_for_index, translate, ReorderMutation};
pub use rules::{can_accept, check_drop, RejectReason};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTree {
    nodes: HashMap<NodeId, CategoryNode>,
}

impl Default for CategoryTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl CategoryTree {
    /// A tree holding only the synthetic root
    pub fn empty() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT_ID, CategoryNode::root());
        Self { nodes }
    }

    pub fn root(&self) -> &CategoryNode {
        // The root is inserted on construction and never removed
        &self.nodes[&ROOT_ID]
    }

    pub fn get(&self, id: NodeId) -> Option<&CategoryNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut CategoryNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of real categories (root excluded)
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all real categories, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied().filter(|id| *id != ROOT_ID)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values().filter(|n| !n.is_root())
    }

    /// Children of `id` in sibling order
    pub fn children_of(&self, id: NodeId) -> impl Iterator<Item = &CategoryNode> {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|child| self.nodes.get(child))
    }

    pub fn parent_of(&self, id: NodeId) -> Option<&CategoryNode> {
        let parent = self.nodes.get(&id)?.parent_id?;
        self.nodes.get(&parent)
    }

    /// True if `candidate` lies strictly below `ancestor`
    pub fn is_descendant(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes.get(&candidate).and_then(|n| n.parent_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent_id);
        }
        false
    }

    /// Levels below `id`: 0 for a leaf, 1 if it only has leaf children, ...
    pub fn subtree_height(&self, id: NodeId) -> u8 {
        self.children_of(id)
            .map(|child| self.subtree_height(child.id) + 1)
            .max()
            .unwrap_or(0)
    }

    /// Ids of the subtree rooted at `id` in pre-order, `id` first
    pub fn subtree_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Append `node` to its parent's child list. The parent must exist.
    pub(crate) fn attach(&mut self, node: CategoryNode) -> bool {
        let Some(parent_id) = node.parent_id else {
            return false;
        };
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        let Some(parent) = self.nodes.get_mut(&parent_id) else {
            return false;
        };
        parent.children.push(node.id);
        self.nodes.insert(node.id, node);
        true
    }

    /// Rewrite ordinals of `parent`'s children to 1..=N in list order
    pub(crate) fn renumber(&mut self, parent: NodeId) {
        let children = match self.nodes.get(&parent) {
            Some(p) => p.children.clone(),
            None => return,
        };
        for (index, child) in children.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(child) {
                node.ordinal = index as u32 + 1;
            }
        }
    }

    /// Re-stamp depths below `id` from its own depth
    pub(crate) fn restamp_depths(&mut self, id: NodeId) {
        let Some(depth) = self.nodes.get(&id).map(|n| n.depth) else {
            return;
        };
        let children = self.nodes[&id].children.clone();
        for child in children {
            if let Some(node) = self.nodes.get_mut(&child) {
                node.set_depth(depth.saturating_add(1));
            }
            self.restamp_depths(child);
        }
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.collapsed)
    }

    /// Set the UI-only collapsed flag. Returns false for unknown ids.
    pub fn set_collapsed(&mut self, id: NodeId, collapsed: bool) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if !node.is_root() => {
                node.collapsed = collapsed;
                true
            }
            _ => false,
        }
    }

    /// Flip the collapsed flag, returning the new value
    pub fn toggle_collapsed(&mut self, id: NodeId) -> Option<bool> {
        let node = self.nodes.get_mut(&id).filter(|n| !n.is_root())?;
        node.collapsed = !node.collapsed;
        Some(node.collapsed)
    }

    pub fn expand_all(&mut self) {
        for node in self.nodes.values_mut() {
            node.collapsed = false;
        }
    }

    pub fn collapse_all(&mut self) {
        for node in self.nodes.values_mut().filter(|n| !n.is_root()) {
            node.collapsed = true;
        }
    }

    /// Nested view rooted at the synthetic root
    pub fn to_nested(&self) -> TreeNode {
        self.nested_from(self.root())
    }

    fn nested_from(&self, node: &CategoryNode) -> TreeNode {
        TreeNode {
            id: node.id,
            depth: node.depth,
            ordinal: node.ordinal,
            name: node.name.clone(),
            visible: node.visible,
            collapsed: node.collapsed,
            acceptance: node.acceptance,
            children: self
                .children_of(node.id)
                .map(|child| self.nested_from(child))
                .collect(),
        }
    }

    /// Check the structural invariants: back-references agree with child
    /// lists, depth is parent depth + 1 and within the ceiling, ordinals are
    /// 1..=N per parent, and every node is reachable from the root.
    pub fn validate(&self) -> DomainResult<()> {
        let mut reached = 0usize;
        let mut stack = vec![ROOT_ID];
        while let Some(id) = stack.pop() {
            let node = self
                .nodes
                .get(&id)
                .ok_or_else(|| DomainError::Internal(format!("dangling child id {}", id)))?;
            reached += 1;
            if node.depth > MAX_DEPTH {
                return Err(DomainError::Internal(format!(
                    "node {} at depth {} exceeds {}",
                    id, node.depth, MAX_DEPTH
                )));
            }
            if node.acceptance != Acceptance::for_depth(node.depth) {
                return Err(DomainError::Internal(format!("node {} has stale acceptance", id)));
            }
            for (index, child_id) in node.children.iter().enumerate() {
                let child = self
                    .nodes
                    .get(child_id)
                    .ok_or_else(|| DomainError::Internal(format!("dangling child id {}", child_id)))?;
                if child.parent_id != Some(id) {
                    return Err(DomainError::Internal(format!(
                        "node {} listed under {} but points at {:?}",
                        child_id, id, child.parent_id
                    )));
                }
                if child.depth != node.depth + 1 {
                    return Err(DomainError::Internal(format!(
                        "node {} at depth {} under parent depth {}",
                        child_id, child.depth, node.depth
                    )));
                }
                if child.ordinal != index as u32 + 1 {
                    return Err(DomainError::Internal(format!(
                        "node {} has ordinal {} at index {}",
                        child_id, child.ordinal, index
                    )));
                }
                stack.push(*child_id);
            }
        }
        if reached != self.nodes.len() {
            return Err(DomainError::Internal(format!(
                "{} nodes unreachable from root",
                self.nodes.len() - reached
            )));
        }
        Ok(())
    }
}

/// Nested, owned view of the tree for the interaction surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub depth: u8,
    pub ordinal: u32,
    pub name: String,
    pub visible: bool,
    pub collapsed: bool,
    pub acceptance: Acceptance,
    pub children: Vec<TreeNode>,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::CategoryRecord;

    pub fn rec(id: NodeId, children: Vec<CategoryRecord>) -> CategoryRecord {
        let record = CategoryRecord::new(id, &format!("c{}", id));
        if children.is_empty() {
            record
        } else {
            record.with_children(children)
        }
    }

    /// One line per node, indented two spaces per level below the root
    pub fn dump(tree: &CategoryTree) -> String {
        fn walk(tree: &CategoryTree, id: NodeId, out: &mut String) {
            for child in tree.children_of(id) {
                out.push_str(&"  ".repeat(usize::from(child.depth) - 1));
                out.push_str(&format!("{}#{}", child.id, child.ordinal));
                if child.collapsed {
                    out.push_str(" +");
                }
                out.push('\n');
                walk(tree, child.id, out);
            }
        }
        let mut out = String::new();
        walk(tree, ROOT_ID, &mut out);
        out.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{dump, rec};
    use super::*;

    fn sample() -> CategoryTree {
        build(&[
            rec(1, vec![rec(2, vec![rec(3, vec![rec(4, vec![])])]), rec(5, vec![])]),
            rec(6, vec![]),
        ])
    }

    #[test]
    fn ancestry_queries() {
        let tree = sample();
        assert!(tree.is_descendant(4, 1));
        assert!(tree.is_descendant(3, 2));
        assert!(!tree.is_descendant(1, 4));
        assert!(!tree.is_descendant(6, 1));
        assert!(!tree.is_descendant(1, 1));
        assert_eq!(tree.parent_of(5).map(|p| p.id), Some(1));
        assert_eq!(tree.parent_of(1).map(|p| p.id), Some(ROOT_ID));
    }

    #[test]
    fn subtree_height_and_ids() {
        let tree = sample();
        assert_eq!(tree.subtree_height(1), 3);
        assert_eq!(tree.subtree_height(3), 1);
        assert_eq!(tree.subtree_height(6), 0);
        assert_eq!(tree.subtree_ids(1), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn collapse_toggles_are_local() {
        let mut tree = sample();
        assert_eq!(tree.toggle_collapsed(1), Some(true));
        assert!(tree.is_collapsed(1));
        assert_eq!(tree.toggle_collapsed(ROOT_ID), None);
        assert!(!tree.set_collapsed(99, true));

        tree.collapse_all();
        assert!(tree.nodes().all(|n| n.collapsed));
        tree.expand_all();
        assert!(tree.nodes().all(|n| !n.collapsed));
    }

    #[test]
    fn nested_view_mirrors_arena() {
        let tree = sample();
        let nested = tree.to_nested();
        assert_eq!(nested.id, ROOT_ID);
        assert_eq!(nested.depth, 0);
        assert_eq!(nested.children.len(), 2);
        assert_eq!(nested.children[0].children[0].children[0].children[0].id, 4);
        assert_eq!(nested.children[0].children[0].children[0].children[0].depth, 4);
    }

    #[test]
    fn validate_catches_gaps() {
        let mut tree = sample();
        assert!(tree.validate().is_ok());
        tree.get_mut(5).unwrap().ordinal = 3;
        assert!(tree.validate().is_err());
    }

    #[test]
    fn dump_format() {
        assert_eq!(dump(&sample()), "1#1\n  2#1\n    3#1\n      4#1\n  5#2\n6#2");
    }
}
