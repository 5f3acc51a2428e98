//! Host View Context
//!
//! Callbacks into the hosting view: selection routing and notifications.

use std::fmt;

use crate::domain::NodeId;

/// User-visible messages raised by the tree core
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A reorder was persisted
    ReorderSaved,
    /// A reorder could not be persisted; the tree shows the last confirmed order
    ReorderFailed(String),
    /// Input rejected before any remote call
    Validation(String),
    /// The category list could not be fetched
    LoadFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ReorderSaved => write!(f, "Order saved."),
            Notice::ReorderFailed(msg) => write!(f, "Could not save the new order: {}", msg),
            Notice::Validation(msg) => write!(f, "{}", msg),
            Notice::LoadFailed(msg) => write!(f, "Could not load categories: {}", msg),
        }
    }
}

/// Hosting view callbacks. All default to no-ops.
pub trait HostView: Send + Sync {
    /// Selection toggled; `None` when cleared. Routes the host to the
    /// top-level or nested edit form.
    fn selection_changed(&self, _id: Option<NodeId>, _is_nested: bool) {}

    /// Depth of the selected node changed
    fn depth_changed(&self, _depth: u8) {}

    fn notify(&self, _notice: Notice) {}
}

/// Host that ignores every callback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHost;

impl HostView for NoopHost {}

impl<T: HostView + ?Sized> HostView for std::sync::Arc<T> {
    fn selection_changed(&self, id: Option<NodeId>, is_nested: bool) {
        (**self).selection_changed(id, is_nested)
    }

    fn depth_changed(&self, depth: u8) {
        (**self).depth_changed(depth)
    }

    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}
