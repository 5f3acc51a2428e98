//! Selection/Detail Binding
//!
//! Which category the detail panel shows, and whether a child can be added
//! under it.

use serde::Serialize;

use crate::domain::{NodeId, SelectionError, MAX_DEPTH, TOP_LEVEL_DEPTH};
use crate::tree::CategoryTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Selection {
    #[default]
    NoSelection,
    Selected {
        id: NodeId,
        depth: u8,
        is_nested: bool,
    },
}

/// Where a new child would go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddChild {
    pub parent_id: NodeId,
    pub child_depth: u8,
}

impl Selection {
    fn selected(id: NodeId, depth: u8) -> Self {
        Selection::Selected {
            id,
            depth,
            is_nested: depth > TOP_LEVEL_DEPTH,
        }
    }

    /// A node was clicked. Clicking the selected node again clears the
    /// selection; any other node replaces it in one step.
    pub fn click(self, id: NodeId, depth: u8) -> Self {
        match self {
            Selection::Selected { id: current, .. } if current == id => Selection::NoSelection,
            _ => Self::selected(id, depth),
        }
    }

    pub fn selected_id(&self) -> Option<NodeId> {
        match self {
            Selection::Selected { id, .. } => Some(*id),
            Selection::NoSelection => None,
        }
    }

    pub fn depth(&self) -> Option<u8> {
        match self {
            Selection::Selected { depth, .. } => Some(*depth),
            Selection::NoSelection => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Selection::Selected { is_nested: true, .. })
    }

    /// Validate an "add child" request against the current selection
    pub fn add_child_target(&self) -> Result<AddChild, SelectionError> {
        match *self {
            Selection::NoSelection => Err(SelectionError::NothingSelected),
            Selection::Selected { id, depth, .. } if depth >= MAX_DEPTH => {
                Err(SelectionError::DepthCeiling { id, depth })
            }
            Selection::Selected { id, depth, .. } => Ok(AddChild {
                parent_id: id,
                child_depth: depth + 1,
            }),
        }
    }

    /// Re-derive depth after a rebuild: the node may have moved, or be gone.
    pub fn after_rebuild(self, tree: &CategoryTree) -> Self {
        match self {
            Selection::Selected { id, .. } => match tree.get(id) {
                Some(node) => Self::selected(id, node.depth),
                None => Selection::NoSelection,
            },
            Selection::NoSelection => Selection::NoSelection,
        }
    }
}
