//! Drag Surface
//!
//! Binds the pointer-driven drag state to the category tree: only targets
//! the nesting rules accept are ever proposed, and a release resolves to a
//! click or a concrete `(dragged, parent, slot)` drop.

use tree_dragdrop::{DndState, DropTarget, Release};

use crate::domain::{NodeId, ROOT_ID};
use crate::tree::{can_accept, CategoryTree};

/// What the user did, once the pointer is released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Click(NodeId),
    Drop {
        dragged: NodeId,
        parent: NodeId,
        slot: usize,
    },
    None,
}

/// Parent and insertion slot a drop target stands for.
/// Dropping onto a row makes the dragged node its first child.
pub fn resolve_target(target: DropTarget) -> (NodeId, usize) {
    match target {
        DropTarget::Item(parent) => (parent, 0),
        DropTarget::Zone(parent, position) => {
            (parent.unwrap_or(ROOT_ID), usize::try_from(position).unwrap_or(0))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragSurface {
    dnd: DndState,
}

impl DragSurface {
    pub fn new(threshold_px: i32) -> Self {
        Self {
            dnd: DndState::with_threshold(threshold_px),
        }
    }

    pub fn state(&self) -> &DndState {
        &self.dnd
    }

    /// The synthetic root has no row and can never be pressed
    pub fn press(&mut self, id: NodeId, x: i32, y: i32) {
        if id != ROOT_ID {
            self.dnd.press(id, x, y);
        }
    }

    pub fn motion(&mut self, x: i32, y: i32) -> bool {
        self.dnd.motion(x, y)
    }

    pub fn hover_item(&mut self, tree: &CategoryTree, id: NodeId) {
        self.dnd.enter_item(id, |dragged, target| accepts(tree, dragged, target));
    }

    /// Hover the gap at `position` among `parent`'s children (`None` = top level)
    pub fn hover_zone(&mut self, tree: &CategoryTree, parent: Option<NodeId>, position: i32) {
        self.dnd
            .enter_zone(parent, position, |dragged, target| accepts(tree, dragged, target));
    }

    pub fn leave(&mut self) {
        self.dnd.leave();
    }

    pub fn release(&mut self) -> Gesture {
        match self.dnd.release() {
            Release::Click(id) => Gesture::Click(id),
            Release::Drop { dragged, target } => {
                let (parent, slot) = resolve_target(target);
                Gesture::Drop { dragged, parent, slot }
            }
            Release::Cancelled => Gesture::None,
        }
    }

    /// Drop any gesture in progress, e.g. when the tree is rebuilt under it
    pub fn cancel(&mut self) {
        self.dnd.cancel();
    }
}

fn accepts(tree: &CategoryTree, dragged: NodeId, target: DropTarget) -> bool {
    let (parent, _) = resolve_target(target);
    can_accept(tree, dragged, parent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryRecord;
    use crate::tree::build;

    fn tree() -> CategoryTree {
        build(&[
            CategoryRecord::new(1, "a").with_children(vec![
                CategoryRecord::new(2, "b"),
                CategoryRecord::new(3, "c"),
            ]),
            CategoryRecord::new(4, "d"),
        ])
    }

    fn start_drag(surface: &mut DragSurface, id: NodeId) {
        surface.press(id, 0, 0);
        assert!(surface.motion(0, 30));
    }

    #[test]
    fn click_passes_through() {
        let mut surface = DragSurface::new(5);
        surface.press(2, 10, 10);
        surface.motion(11, 11);
        assert_eq!(surface.release(), Gesture::Click(2));
    }

    #[test]
    fn legal_zone_drop_resolves_parent_and_slot() {
        let tree = tree();
        let mut surface = DragSurface::new(5);
        start_drag(&mut surface, 3);
        surface.hover_zone(&tree, Some(1), 0);
        assert_eq!(
            surface.release(),
            Gesture::Drop {
                dragged: 3,
                parent: 1,
                slot: 0
            }
        );
    }

    #[test]
    fn illegal_target_is_never_proposed() {
        let tree = tree();
        let mut surface = DragSurface::new(5);
        start_drag(&mut surface, 2);
        // Nested node onto the top level
        surface.hover_zone(&tree, None, 0);
        assert_eq!(surface.state().drop_target(), None);
        assert_eq!(surface.release(), Gesture::None);
    }

    #[test]
    fn item_drop_becomes_first_child() {
        let tree = tree();
        let mut surface = DragSurface::new(5);
        start_drag(&mut surface, 2);
        surface.hover_item(&tree, 4);
        // 4 is top level and 2 is nested: accepted
        assert_eq!(
            surface.release(),
            Gesture::Drop {
                dragged: 2,
                parent: 4,
                slot: 0
            }
        );
    }

    #[test]
    fn root_cannot_be_pressed() {
        let mut surface = DragSurface::new(5);
        surface.press(ROOT_ID, 0, 0);
        assert!(!surface.motion(0, 50));
        assert_eq!(surface.release(), Gesture::None);
    }

    #[test]
    fn negative_zone_position_clamps() {
        assert_eq!(resolve_target(DropTarget::Zone(Some(4), -3)), (4, 0));
        assert_eq!(resolve_target(DropTarget::Zone(None, 2)), (ROOT_ID, 2));
    }
}
