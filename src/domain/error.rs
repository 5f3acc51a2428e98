//! Domain Layer - Errors
//!
//! Error taxonomy shared by the backend seam and the tree core.

use serde::{Deserialize, Serialize};

use super::category::NodeId;

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors, as reported by a category backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Post-drop lookup failed: the drag surface and the tree model disagree
/// about where the dragged node ended up. Never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    #[error("drop parent {parent} missing from the settled tree")]
    ParentMissing { parent: NodeId },
    #[error("node {dragged} not found under parent {parent} after drop")]
    NotUnderParent { dragged: NodeId, parent: NodeId },
}

/// User-facing validation for the "add child" action
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Select a category first.")]
    NothingSelected,
    #[error("Category {id} is at depth {depth}; no further levels can be added.")]
    DepthCeiling { id: NodeId, depth: u8 },
}
