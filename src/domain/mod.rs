//! Domain Layer
//!
//! Contains the category entity and the error taxonomy.
//! This layer has NO external dependencies (except serde and thiserror).

mod category;
mod error;

pub use category::{
    Acceptance, CategoryNode, NodeId, MAX_DEPTH, ROOT_DEPTH, ROOT_ID, TOP_LEVEL_DEPTH,
};
pub use error::{DomainError, DomainResult, ReorderError, SelectionError};
