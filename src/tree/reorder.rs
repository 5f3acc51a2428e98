//! Reorder Translator
//!
//! Turns a settled drop into the minimal remote update.

use serde::{Deserialize, Serialize};

use super::CategoryTree;
use crate::domain::{NodeId, ReorderError, ROOT_ID};

/// New structural position of one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderMutation {
    pub id: NodeId,
    pub new_depth: u8,
    /// 0 means top level
    pub new_parent_id: NodeId,
    /// 1-based
    pub new_ordinal: u32,
}

/// Optimistic post-drop tree: `dragged` (with its subtree) moved under
/// `parent` at insertion `slot`.
///
/// `slot` counts positions in the pre-drop sibling list, the way drop zones
/// between rows are laid out, so moving a node down within its own parent
/// accounts for the entry it leaves behind. Depths below the moved node and
/// ordinals of both sibling groups are recomputed. Returns `None` for
/// unknown ids or a move into the node's own subtree.
pub fn apply_drop(tree: &CategoryTree, dragged: NodeId, parent: NodeId, slot: usize) -> Option<CategoryTree> {
    if dragged == parent || tree.is_descendant(parent, dragged) || !tree.contains(parent) {
        return None;
    }
    let old_parent = tree.get(dragged)?.parent_id?;
    let old_index = tree
        .get(old_parent)?
        .children
        .iter()
        .position(|c| *c == dragged)?;

    let mut next = tree.clone();
    next.get_mut(old_parent)?.children.remove(old_index);

    let mut index = slot;
    if old_parent == parent && old_index < slot {
        index -= 1;
    }
    let new_depth = {
        let target = next.get_mut(parent)?;
        let index = index.min(target.children.len());
        target.children.insert(index, dragged);
        target.depth + 1
    };

    let node = next.get_mut(dragged)?;
    node.parent_id = Some(parent);
    node.set_depth(new_depth);
    next.restamp_depths(dragged);

    next.renumber(old_parent);
    if old_parent != parent {
        next.renumber(parent);
    }
    Some(next)
}

/// Pre-drop slot for a node that should end up at `new_index` among
/// `parent`'s children once the drop has settled.
///
/// The two only differ when the node moves down within its own parent: the
/// slot still counts the entry it leaves behind.
pub fn slot_for_index(tree: &CategoryTree, dragged: NodeId, parent: NodeId, new_index: usize) -> usize {
    let current = tree.get(dragged).and_then(|n| n.parent_id);
    let old_index = tree
        .get(parent)
        .and_then(|p| p.children.iter().position(|c| *c == dragged));
    match (current, old_index) {
        (Some(current), Some(old)) if current == parent && old < new_index => new_index + 1,
        _ => new_index,
    }
}

/// Compute the remote update from the settled tree.
///
/// The position comes from where `dragged` actually sits in `parent`'s child
/// list after the drop, never from an index captured before it.
pub fn translate(post_drop: &CategoryTree, dragged: NodeId, parent: NodeId) -> Result<ReorderMutation, ReorderError> {
    let parent_node = post_drop
        .get(parent)
        .ok_or(ReorderError::ParentMissing { parent })?;
    let index = parent_node
        .children
        .iter()
        .position(|c| *c == dragged)
        .ok_or(ReorderError::NotUnderParent { dragged, parent })?;

    Ok(ReorderMutation {
        id: dragged,
        new_depth: parent_node.depth + 1,
        new_parent_id: if parent_node.is_root() { ROOT_ID } else { parent_node.id },
        new_ordinal: index as u32 + 1,
    })
}
