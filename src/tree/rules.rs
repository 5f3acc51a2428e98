//! Nesting Rule Engine
//!
//! Decides whether a drop is structurally legal. Depths only; names and
//! content never matter.

use std::fmt;

use super::CategoryTree;
use crate::domain::{NodeId, MAX_DEPTH};

/// Why a drop was refused. A decision, not an error: the drag snaps back
/// and nothing is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownNode,
    UnknownTarget,
    RootNotDraggable,
    OntoSelf,
    /// The target lies inside the dragged subtree
    Cycle,
    /// Target sits at the depth ceiling
    DepthCeiling,
    /// Target does not take children of the dragged node's depth
    DepthMismatch,
    /// The dragged node's descendants would end up below the ceiling
    SubtreeTooDeep,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::UnknownNode => "dragged node is not in the tree",
            RejectReason::UnknownTarget => "target is not in the tree",
            RejectReason::RootNotDraggable => "the root cannot be dragged",
            RejectReason::OntoSelf => "a node cannot be its own parent",
            RejectReason::Cycle => "target is inside the dragged subtree",
            RejectReason::DepthCeiling => "target is at the maximum depth",
            RejectReason::DepthMismatch => "target does not accept this depth",
            RejectReason::SubtreeTooDeep => "subtree would exceed the maximum depth",
        };
        f.write_str(text)
    }
}

/// Check dropping `dragged` as a child of `parent`
pub fn check_drop(tree: &CategoryTree, dragged: NodeId, parent: NodeId) -> Result<(), RejectReason> {
    let node = tree.get(dragged).ok_or(RejectReason::UnknownNode)?;
    if node.is_root() {
        return Err(RejectReason::RootNotDraggable);
    }
    let target = tree.get(parent).ok_or(RejectReason::UnknownTarget)?;
    if dragged == parent {
        return Err(RejectReason::OntoSelf);
    }
    if tree.is_descendant(parent, dragged) {
        return Err(RejectReason::Cycle);
    }
    if target.depth >= MAX_DEPTH {
        return Err(RejectReason::DepthCeiling);
    }
    if !target.can_accept_children_of_depth(node.depth) {
        return Err(RejectReason::DepthMismatch);
    }
    // Deepest descendant after the move: new depth of `dragged` plus its height
    let deepest = u16::from(target.depth) + 1 + u16::from(tree.subtree_height(dragged));
    if deepest > u16::from(MAX_DEPTH) {
        return Err(RejectReason::SubtreeTooDeep);
    }
    Ok(())
}

/// `check_drop` as a plain decision, logging refusals
pub fn can_accept(tree: &CategoryTree, dragged: NodeId, parent: NodeId) -> bool {
    match check_drop(tree, dragged, parent) {
        Ok(()) => true,
        Err(reason) => {
            log::debug!("drop refused: dragged={}, parent={}: {}", dragged, parent, reason);
            false
        }
    }
}
