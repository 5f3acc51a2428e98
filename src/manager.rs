//! Tree Manager
//!
//! Drives the fetch → build → reconcile pipeline and the drop → translate →
//! persist → refetch cycle against a [`CategoryBackend`], reporting to a
//! [`HostView`].
//!
//! Reorders are serialized through a gate: while one is in flight a second
//! drop is refused as busy, and a refresh waits for it, so a refetch is
//! only applied once the mutation it depends on has resolved. Selection and
//! collapse toggles only touch local state and never wait on the gate.

use tokio::sync::Mutex;

use crate::commands::{CategoryBackend, ListCategoriesArgs, MoveCategoryArgs};
use crate::config::TreeConfig;
use crate::context::{HostView, Notice};
use crate::domain::{DomainResult, NodeId, ReorderError, SelectionError};
use crate::selection::{AddChild, Selection};
use crate::store::ViewState;
use crate::surface::Gesture;
use crate::tree::{apply_drop, check_drop, slot_for_index, translate, RejectReason, ReorderMutation};

/// Result of handing a completed drop to the manager
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Persisted and refetched
    Committed(ReorderMutation),
    /// Refused by the nesting rules; nothing was sent
    Rejected(RejectReason),
    /// Another reorder is still in flight; nothing was sent
    Busy,
    /// The drop could not be located in the settled tree; nothing was sent
    Inconsistent(ReorderError),
    /// The backend refused or failed; the last confirmed tree is kept
    Failed(String),
}

/// Where a dropped node goes among its new siblings
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// Gap between rows, counted in the pre-drop child list
    Slot(usize),
    /// Index in the child list after the drop
    Index(usize),
}

pub struct TreeManager<B, H> {
    backend: B,
    host: H,
    language: String,
    state: Mutex<ViewState>,
    reorder_gate: Mutex<()>,
}

impl<B: CategoryBackend, H: HostView> TreeManager<B, H> {
    pub fn new(backend: B, host: H, config: &TreeConfig) -> Self {
        Self {
            backend,
            host,
            language: config.language.clone(),
            state: Mutex::new(ViewState::new()),
            reorder_gate: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Copy of the current view state
    pub async fn snapshot(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    pub async fn selection(&self) -> Selection {
        self.state.lock().await.selection
    }

    /// Refetch and rebuild. Called on mount and whenever a create, edit or
    /// delete completes elsewhere in the view.
    pub async fn refresh(&self) -> DomainResult<()> {
        let _gate = self.reorder_gate.lock().await;
        self.refetch().await
    }

    /// Fetch and apply. Callers hold the reorder gate.
    async fn refetch(&self) -> DomainResult<()> {
        let args = ListCategoriesArgs {
            lang: self.language.clone(),
        };
        let records = match self.backend.list_categories(&args).await {
            Ok(records) => records,
            Err(e) => {
                log::warn!("category list fetch failed: {}", e);
                self.host.notify(Notice::LoadFailed(e.to_string()));
                return Err(e);
            }
        };

        let mut state = self.state.lock().await;
        let before = state.selection;
        let next = std::mem::take(&mut *state).refetched(&records);
        if let Err(e) = next.tree.validate() {
            log::error!("rebuilt tree is inconsistent: {}", e);
        }
        log::info!(
            "category tree rebuilt: {} nodes, version {}",
            next.tree.len(),
            next.reload_version
        );
        let after = next.selection;
        *state = next;
        drop(state);

        self.report_selection(before, after);
        Ok(())
    }

    /// A row was clicked
    pub async fn click(&self, id: NodeId) -> Selection {
        let mut state = self.state.lock().await;
        let before = state.selection;
        *state = std::mem::take(&mut *state).clicked(id);
        let after = state.selection;
        drop(state);

        self.report_selection(before, after);
        after
    }

    pub async fn toggle_collapsed(&self, id: NodeId) -> Option<bool> {
        self.state.lock().await.tree.toggle_collapsed(id)
    }

    /// Structural check for a hover, without side effects
    pub async fn can_accept(&self, dragged: NodeId, parent: NodeId) -> bool {
        check_drop(&self.state.lock().await.tree, dragged, parent).is_ok()
    }

    /// Validate an "add child" request. Rejections are shown to the user;
    /// nothing is created here either way.
    pub async fn request_add_child(&self) -> Result<AddChild, SelectionError> {
        let selection = self.state.lock().await.selection;
        selection.add_child_target().inspect_err(|e| {
            log::debug!("add child refused: {}", e);
            self.host.notify(Notice::Validation(e.to_string()));
        })
    }

    /// Route a finished pointer gesture
    pub async fn handle_gesture(&self, gesture: Gesture) -> Option<DropOutcome> {
        match gesture {
            Gesture::Click(id) => {
                self.click(id).await;
                None
            }
            Gesture::Drop { dragged, parent, slot } => Some(self.drop_node(dragged, parent, slot).await),
            Gesture::None => None,
        }
    }

    /// A drop landed on the gap `slot` among `parent`'s children.
    ///
    /// `slot` counts gaps in the child list as it was before the drag, the
    /// way [`crate::surface::DragSurface`] reports zones: moving the second
    /// of three children to the end is slot 3. Hosts that know the index the
    /// node should hold afterwards use [`TreeManager::settle`] instead.
    pub async fn drop_node(&self, dragged: NodeId, parent: NodeId, slot: usize) -> DropOutcome {
        self.place(dragged, parent, Placement::Slot(slot)).await
    }

    /// A drop settled with `dragged` at `new_index` (0-based) among
    /// `parent`'s children after the move: moving the second of three
    /// children to the end is index 2.
    pub async fn settle(&self, dragged: NodeId, parent: NodeId, new_index: usize) -> DropOutcome {
        self.place(dragged, parent, Placement::Index(new_index)).await
    }

    async fn place(&self, dragged: NodeId, parent: NodeId, placement: Placement) -> DropOutcome {
        let Ok(_gate) = self.reorder_gate.try_lock() else {
            log::debug!("drop of {} ignored: reorder in flight", dragged);
            return DropOutcome::Busy;
        };

        let mutation = {
            let state = self.state.lock().await;
            if let Err(reason) = check_drop(&state.tree, dragged, parent) {
                log::debug!("drop refused: dragged={}, parent={}: {}", dragged, parent, reason);
                return DropOutcome::Rejected(reason);
            }
            let slot = match placement {
                Placement::Slot(slot) => slot,
                Placement::Index(index) => slot_for_index(&state.tree, dragged, parent, index),
            };
            let settled = apply_drop(&state.tree, dragged, parent, slot);
            let result = match settled {
                Some(post_drop) => translate(&post_drop, dragged, parent),
                None => Err(ReorderError::NotUnderParent { dragged, parent }),
            };
            match result {
                Ok(mutation) => mutation,
                Err(e) => {
                    log::error!("drop could not be settled, not sending: {}", e);
                    self.host.notify(Notice::ReorderFailed(e.to_string()));
                    return DropOutcome::Inconsistent(e);
                }
            }
        };

        log::debug!("sending reorder {:?}", mutation);
        if let Err(e) = self.backend.move_category(&MoveCategoryArgs::from(mutation)).await {
            log::warn!("reorder of {} failed: {}", dragged, e);
            self.host.notify(Notice::ReorderFailed(e.to_string()));
            return DropOutcome::Failed(e.to_string());
        }

        log::info!(
            "reordered {} under {} at {}",
            mutation.id,
            mutation.new_parent_id,
            mutation.new_ordinal
        );
        self.host.notify(Notice::ReorderSaved);
        // Refetch failures were already reported; the mutation itself stands
        let _ = self.refetch().await;
        DropOutcome::Committed(mutation)
    }

    fn report_selection(&self, before: Selection, after: Selection) {
        if before == after {
            return;
        }
        if before.selected_id() != after.selected_id() {
            self.host.selection_changed(after.selected_id(), after.is_nested());
        }
        if let Some(depth) = after.depth() {
            if before.depth() != Some(depth) {
                self.host.depth_changed(depth);
            }
        }
    }
}
