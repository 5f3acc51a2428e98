//! Tree DragDrop Utilities
//!
//! Simple drag-and-drop state for tree views driven by pointer events.
//! Uses movement threshold to distinguish click from drag.
//!
//! The host forwards raw pointer events (press, motion, enter, leave,
//! release) and gets back a [`Release`] telling it whether the gesture was a
//! click or a drop. Nothing here knows about rendering.

use serde::{Deserialize, Serialize};

/// Drop target types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropTarget {
    /// Drop on an item (become child)
    Item(u32),
    /// Drop on a zone between items (parent_id, position)
    Zone(Option<u32>, i32),
}

/// Outcome of releasing the pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    /// Pointer went down and up on an item without moving past the threshold
    Click(u32),
    /// A drag ended over an accepted target
    Drop { dragged: u32, target: DropTarget },
    /// A drag ended with no target, or nothing was pressed
    Cancelled,
}

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// DnD state
#[derive(Clone, Debug)]
pub struct DndState {
    dragging_id: Option<u32>,
    drop_target: Option<DropTarget>,
    drag_just_ended: bool,
    /// Pending item id (pressed but not yet dragging)
    pending_id: Option<u32>,
    /// Start position for movement detection
    start_x: i32,
    start_y: i32,
    threshold: i32,
}

impl Default for DndState {
    fn default() -> Self {
        Self::new()
    }
}

impl DndState {
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(threshold: i32) -> Self {
        Self {
            dragging_id: None,
            drop_target: None,
            drag_just_ended: false,
            pending_id: None,
            start_x: 0,
            start_y: 0,
            threshold: threshold.max(0),
        }
    }

    pub fn dragging_id(&self) -> Option<u32> {
        self.dragging_id
    }

    pub fn pending_id(&self) -> Option<u32> {
        self.pending_id
    }

    pub fn drop_target(&self) -> Option<DropTarget> {
        self.drop_target
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging_id.is_some()
    }

    /// True right after a drag ended, until [`DndState::clear_just_ended`].
    /// Hosts use it to swallow the click event that follows a drop.
    pub fn drag_just_ended(&self) -> bool {
        self.drag_just_ended
    }

    pub fn clear_just_ended(&mut self) {
        self.drag_just_ended = false;
    }

    /// Record pending drag with start position
    pub fn press(&mut self, item_id: u32, x: i32, y: i32) {
        self.pending_id = Some(item_id);
        self.start_x = x;
        self.start_y = y;
    }

    /// Starts the drag once the pointer moved past the threshold.
    /// Returns true on the motion that started it.
    pub fn motion(&mut self, x: i32, y: i32) -> bool {
        let Some(pending) = self.pending_id else {
            return false;
        };
        if self.dragging_id.is_some() {
            return false;
        }

        let dx = (x - self.start_x).abs();
        let dy = (y - self.start_y).abs();
        if dx > self.threshold || dy > self.threshold {
            log::debug!("[DND] drag started: id={}", pending);
            self.dragging_id = Some(pending);
            return true;
        }
        false
    }

    /// Pointer entered an item. `accept` decides whether the dragged id may
    /// become its child; a refused target leaves no target set.
    pub fn enter_item<F>(&mut self, item_id: u32, accept: F)
    where
        F: FnOnce(u32, DropTarget) -> bool,
    {
        let Some(dragging) = self.dragging_id else {
            return;
        };
        // Don't allow dropping on self
        if dragging == item_id {
            self.drop_target = None;
            return;
        }
        self.propose(dragging, DropTarget::Item(item_id), accept);
    }

    /// Pointer entered a gap between items
    pub fn enter_zone<F>(&mut self, parent_id: Option<u32>, position: i32, accept: F)
    where
        F: FnOnce(u32, DropTarget) -> bool,
    {
        let Some(dragging) = self.dragging_id else {
            return;
        };
        self.propose(dragging, DropTarget::Zone(parent_id, position), accept);
    }

    fn propose<F>(&mut self, dragging: u32, target: DropTarget, accept: F)
    where
        F: FnOnce(u32, DropTarget) -> bool,
    {
        if accept(dragging, target) {
            self.drop_target = Some(target);
        } else {
            log::debug!("[DND] target refused: dragged={}, target={:?}", dragging, target);
            self.drop_target = None;
        }
    }

    pub fn leave(&mut self) {
        if self.dragging_id.is_some() {
            self.drop_target = None;
        }
    }

    /// Pointer released. Ends any drag and reports what happened.
    pub fn release(&mut self) -> Release {
        let pending = self.pending_id.take();
        let dragging = self.dragging_id.take();
        let target = self.drop_target.take();

        match (dragging, target) {
            (Some(dragged), Some(target)) => {
                self.drag_just_ended = true;
                Release::Drop { dragged, target }
            }
            (Some(_), None) => {
                self.drag_just_ended = true;
                Release::Cancelled
            }
            (None, _) => match pending {
                Some(id) => Release::Click(id),
                None => Release::Cancelled,
            },
        }
    }

    /// Abort everything, e.g. when the tree is rebuilt under the pointer.
    pub fn cancel(&mut self) {
        self.pending_id = None;
        self.dragging_id = None;
        self.drop_target = None;
    }
}
