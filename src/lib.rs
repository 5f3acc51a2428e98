//! Category Tree
//!
//! Layered architecture:
//! - domain: Category node, depth constants and error types
//! - models: Wire records from the category list endpoint
//! - tree: Arena tree, builder, collapse reconciliation, nesting rules and
//!   reorder translation
//! - selection / store: Selection state machine and the view state it lives in
//! - surface: Pointer drag state bound to the nesting rules
//! - commands / repository: Backend seam and an in-memory implementation
//! - manager: Fetch, drop and refetch orchestration

pub mod commands;
pub mod config;
pub mod context;
pub mod domain;
pub mod logging;
pub mod manager;
pub mod models;
pub mod repository;
pub mod selection;
pub mod store;
pub mod surface;
pub mod tree;

pub use commands::{CategoryBackend, ListCategoriesArgs, MoveCategoryArgs};
pub use config::{ConfigError, LogConfig, TreeConfig};
pub use context::{HostView, NoopHost, Notice};
pub use domain::{
    Acceptance, CategoryNode, DomainError, DomainResult, NodeId, ReorderError, SelectionError,
    MAX_DEPTH, ROOT_ID,
};
pub use manager::{DropOutcome, TreeManager};
pub use models::{parse_records, CategoryRecord, RawId};
pub use repository::MemoryCategoryRepository;
pub use selection::{AddChild, Selection};
pub use store::ViewState;
pub use surface::{DragSurface, Gesture};
pub use tree::{CategoryTree, RejectReason, ReorderMutation, TreeNode, VisibleRow};
