//! Backend Command Bindings
//!
//! The two calls the tree core makes to the category backend, and their
//! argument shapes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainResult, NodeId};
use crate::models::CategoryRecord;
use crate::tree::ReorderMutation;

// ========================
// Command Argument Structs
// ========================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCategoriesArgs {
    pub lang: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCategoryArgs {
    pub id: NodeId,
    #[serde(rename = "moveDepth")]
    pub move_depth: u8,
    /// 0 = top level
    #[serde(rename = "moveParent")]
    pub move_parent: NodeId,
    #[serde(rename = "newOrdinal")]
    pub new_ordinal: u32,
}

impl From<ReorderMutation> for MoveCategoryArgs {
    fn from(m: ReorderMutation) -> Self {
        Self {
            id: m.id,
            move_depth: m.new_depth,
            move_parent: m.new_parent_id,
            new_ordinal: m.new_ordinal,
        }
    }
}

// ========================
// Backend Seam
// ========================

/// Category backend as seen by the tree core.
///
/// Transport is up to the implementor. Responses are authoritative: every
/// list result fully replaces the tree.
#[async_trait]
pub trait CategoryBackend: Send + Sync {
    /// Full current category collection for a language
    async fn list_categories(&self, args: &ListCategoriesArgs) -> DomainResult<Vec<CategoryRecord>>;

    /// Persist a node's new structural position. Success/failure only.
    async fn move_category(&self, args: &MoveCategoryArgs) -> DomainResult<()>;
}

#[async_trait]
impl<T: CategoryBackend + ?Sized> CategoryBackend for std::sync::Arc<T> {
    async fn list_categories(&self, args: &ListCategoriesArgs) -> DomainResult<Vec<CategoryRecord>> {
        (**self).list_categories(args).await
    }

    async fn move_category(&self, args: &MoveCategoryArgs) -> DomainResult<()> {
        (**self).move_category(args).await
    }
}
