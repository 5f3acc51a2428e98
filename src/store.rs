//! View State Store
//!
//! Everything the category view holds between events, as one value.
//! Each transition takes the previous state and returns the next one.

use crate::domain::NodeId;
use crate::models::CategoryRecord;
use crate::selection::Selection;
use crate::tree::{build, reconcile, CategoryTree};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Last confirmed tree, never an optimistic drag preview
    pub tree: CategoryTree,
    pub selection: Selection,
    /// Bumped on every applied refetch, for hosts keying re-renders
    pub reload_version: u32,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh backend response arrived: rebuild, carry collapse flags over,
    /// re-derive the selection.
    pub fn refetched(self, records: &[CategoryRecord]) -> Self {
        let tree = reconcile(build(records), &self.tree);
        let selection = self.selection.after_rebuild(&tree);
        Self {
            tree,
            selection,
            reload_version: self.reload_version.wrapping_add(1),
        }
    }

    /// A row was clicked. Unknown ids leave the state as is.
    pub fn clicked(self, id: NodeId) -> Self {
        let Some(depth) = self.tree.get(id).filter(|n| !n.is_root()).map(|n| n.depth) else {
            return self;
        };
        Self {
            selection: self.selection.click(id, depth),
            ..self
        }
    }

    pub fn collapse_toggled(mut self, id: NodeId) -> Self {
        self.tree.toggle_collapsed(id);
        self
    }
}
