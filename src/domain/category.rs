//! Category Entity
//!
//! One node of the navigation taxonomy, stored in the tree arena.

use serde::{Deserialize, Serialize};

/// Category identifier as issued by the backend
pub type NodeId = u32;

/// Id of the synthetic root. The backend never issues it, and it is also
/// the wire value for "top level" when a node is moved.
pub const ROOT_ID: NodeId = 0;

pub const ROOT_DEPTH: u8 = 0;
pub const TOP_LEVEL_DEPTH: u8 = 1;
/// Deepest level a category may live at
pub const MAX_DEPTH: u8 = 4;

/// Which child depths a node takes, derived from its own depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// The synthetic root: top-level categories only
    TopLevelOnly,
    /// Depths 1..=3: any nested category
    Nested,
    /// Depth 4: leaf ceiling
    Nothing,
}

impl Acceptance {
    pub fn for_depth(depth: u8) -> Self {
        match depth {
            ROOT_DEPTH => Acceptance::TopLevelOnly,
            d if d < MAX_DEPTH => Acceptance::Nested,
            _ => Acceptance::Nothing,
        }
    }

    pub fn accepts(self, child_depth: u8) -> bool {
        match self {
            Acceptance::TopLevelOnly => child_depth == TOP_LEVEL_DEPTH,
            Acceptance::Nested => child_depth > TOP_LEVEL_DEPTH,
            Acceptance::Nothing => false,
        }
    }
}

/// A category in the tree arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: NodeId,
    /// `None` only for the synthetic root
    pub parent_id: Option<NodeId>,
    pub depth: u8,
    /// 1-based position among siblings
    pub ordinal: u32,
    pub name: String,
    /// Use flag (shown on the site or not)
    pub visible: bool,
    pub banner: Option<String>,
    pub content_type: Option<String>,
    /// Child ids in sibling order
    pub children: Vec<NodeId>,
    /// UI only, never persisted
    pub collapsed: bool,
    pub acceptance: Acceptance,
}

impl CategoryNode {
    pub fn root() -> Self {
        Self {
            id: ROOT_ID,
            parent_id: None,
            depth: ROOT_DEPTH,
            ordinal: 0,
            name: String::new(),
            visible: false,
            banner: None,
            content_type: None,
            children: Vec::new(),
            collapsed: false,
            acceptance: Acceptance::for_depth(ROOT_DEPTH),
        }
    }

    /// Create a leaf under `parent_id` at the given depth and ordinal
    pub fn new(id: NodeId, name: String, parent_id: NodeId, depth: u8, ordinal: u32) -> Self {
        Self {
            id,
            parent_id: Some(parent_id),
            depth,
            ordinal,
            name,
            visible: true,
            banner: None,
            content_type: None,
            children: Vec::new(),
            collapsed: false,
            acceptance: Acceptance::for_depth(depth),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Nested categories (depth > 1) use a different edit form than top-level ones
    pub fn is_nested(&self) -> bool {
        self.depth > TOP_LEVEL_DEPTH
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn can_accept_children_of_depth(&self, child_depth: u8) -> bool {
        self.acceptance.accepts(child_depth)
    }

    /// Re-stamp depth and the acceptance derived from it
    pub(crate) fn set_depth(&mut self, depth: u8) {
        self.depth = depth;
        self.acceptance = Acceptance::for_depth(depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_accepts_only_top_level() {
        let root = CategoryNode::root();
        assert!(root.is_root());
        assert!(root.can_accept_children_of_depth(1));
        for depth in [0, 2, 3, 4, 5] {
            assert!(!root.can_accept_children_of_depth(depth));
        }
    }

    #[test]
    fn middle_depths_accept_any_nested_depth() {
        for parent_depth in 1..=3 {
            let node = CategoryNode::new(9, "n".to_string(), ROOT_ID, parent_depth, 1);
            assert!(!node.can_accept_children_of_depth(1));
            for depth in 2..=4 {
                assert!(node.can_accept_children_of_depth(depth));
            }
        }
    }

    #[test]
    fn depth_four_accepts_nothing() {
        let leaf = CategoryNode::new(9, "leaf".to_string(), 3, MAX_DEPTH, 1);
        for depth in 0..=5 {
            assert!(!leaf.can_accept_children_of_depth(depth));
        }
    }

    #[test]
    fn nested_classification() {
        assert!(!CategoryNode::new(1, "a".to_string(), ROOT_ID, 1, 1).is_nested());
        assert!(CategoryNode::new(2, "b".to_string(), 1, 2, 1).is_nested());
    }
}
