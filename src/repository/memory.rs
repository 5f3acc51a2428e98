//! In-Memory Category Repository
//!
//! A [`CategoryBackend`] held entirely in process. Used by tests and demos
//! to stand in for the real backend, including its ordering rules: sibling
//! positions are kept as a contiguous 1-based sequence after every move,
//! create and delete.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::commands::{CategoryBackend, ListCategoriesArgs, MoveCategoryArgs};
use crate::domain::{DomainError, DomainResult, NodeId, MAX_DEPTH, ROOT_ID};
use crate::models::CategoryRecord;

#[derive(Debug, Clone)]
struct CategoryRow {
    id: NodeId,
    /// ROOT_ID for top level
    parent_id: NodeId,
    /// 1-based within the parent
    position: u32,
    name: String,
    visible: bool,
    banner: Option<String>,
    content_type: Option<String>,
}

#[derive(Debug, Default)]
struct RepoState {
    rows: Vec<CategoryRow>,
    next_id: NodeId,
    fail_next_move: Option<DomainError>,
    fail_next_list: Option<DomainError>,
    move_calls: Vec<MoveCategoryArgs>,
    list_calls: Vec<ListCategoriesArgs>,
}

impl RepoState {
    fn find(&self, id: NodeId) -> Option<&CategoryRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    fn depth_of(&self, id: NodeId) -> Option<u8> {
        let mut depth = 0u8;
        let mut current = id;
        while current != ROOT_ID {
            current = self.find(current)?.parent_id;
            depth = depth.checked_add(1)?;
        }
        Some(depth)
    }

    fn is_descendant(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.find(candidate).map(|r| r.parent_id);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if id == ROOT_ID {
                break;
            }
            current = self.find(id).map(|r| r.parent_id);
        }
        false
    }

    /// Ids under `parent` ordered by position, then id
    fn children_ids(&self, parent: NodeId) -> Vec<NodeId> {
        let mut children: Vec<&CategoryRow> = self.rows.iter().filter(|r| r.parent_id == parent).collect();
        children.sort_by_key(|r| (r.position, r.id));
        children.iter().map(|r| r.id).collect()
    }

    /// Rewrite positions under a parent to be sequential (1, 2, 3, ...)
    fn reindex(&mut self, parent: NodeId, order: &[NodeId]) {
        for (index, id) in order.iter().enumerate() {
            if let Some(row) = self.rows.iter_mut().find(|r| r.id == *id && r.parent_id == parent) {
                row.position = index as u32 + 1;
            }
        }
    }

    fn next_position(&self, parent: NodeId) -> u32 {
        self.rows
            .iter()
            .filter(|r| r.parent_id == parent)
            .map(|r| r.position)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn allocate_id(&mut self) -> NodeId {
        self.next_id += 1;
        self.next_id
    }

    fn to_records(&self, parent: NodeId, depth: u8) -> Vec<CategoryRecord> {
        self.children_ids(parent)
            .into_iter()
            .filter_map(|id| self.find(id))
            .map(|row| {
                let children = self.to_records(row.id, depth + 1);
                CategoryRecord {
                    id: row.id.into(),
                    depth: Some(i64::from(depth)),
                    name: row.name.clone(),
                    visible: row.visible,
                    banner: row.banner.clone(),
                    content_type: row.content_type.clone(),
                    children: Some(children),
                }
            })
            .collect()
    }

    fn load(&mut self, records: &[CategoryRecord], parent: NodeId) {
        for record in records {
            let Some(id) = record.id.as_node_id() else {
                continue;
            };
            let position = self.next_position(parent);
            self.rows.push(CategoryRow {
                id,
                parent_id: parent,
                position,
                name: record.name.clone(),
                visible: record.visible,
                banner: record.banner.clone(),
                content_type: record.content_type.clone(),
            });
            self.next_id = self.next_id.max(id);
            self.load(record.children.as_deref().unwrap_or(&[]), id);
        }
    }
}

/// In-memory implementation of the category backend
#[derive(Debug, Default)]
pub struct MemoryCategoryRepository {
    state: Mutex<RepoState>,
}

impl MemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a nested record list; sibling order is list order
    pub fn from_records(records: Vec<CategoryRecord>) -> Self {
        let mut state = RepoState::default();
        state.load(&records, ROOT_ID);
        Self {
            state: Mutex::new(state),
        }
    }

    /// Create a category as the last child of `parent_id` (ROOT_ID = top level)
    pub async fn create(&self, name: &str, parent_id: NodeId) -> DomainResult<NodeId> {
        let mut state = self.state.lock().await;
        if parent_id != ROOT_ID {
            let depth = state
                .depth_of(parent_id)
                .ok_or_else(|| DomainError::NotFound(format!("Category {} not found", parent_id)))?;
            if depth >= MAX_DEPTH {
                return Err(DomainError::InvalidInput(format!(
                    "Category {} is at depth {}",
                    parent_id, depth
                )));
            }
        }
        let id = state.allocate_id();
        let position = state.next_position(parent_id);
        state.rows.push(CategoryRow {
            id,
            parent_id,
            position,
            name: name.to_string(),
            visible: true,
            banner: None,
            content_type: None,
        });
        Ok(id)
    }

    pub async fn rename(&self, id: NodeId, name: &str) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        let row = state
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("Category {} not found", id)))?;
        row.name = name.to_string();
        Ok(())
    }

    /// Delete a category and everything below it
    pub async fn delete(&self, id: NodeId) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        let parent = state
            .find(id)
            .map(|r| r.parent_id)
            .ok_or_else(|| DomainError::NotFound(format!("Category {} not found", id)))?;

        let mut doomed = vec![id];
        let mut to_visit = vec![id];
        while let Some(current) = to_visit.pop() {
            let children = state.children_ids(current);
            to_visit.extend(&children);
            doomed.extend(children);
        }
        state.rows.retain(|r| !doomed.contains(&r.id));

        let order = state.children_ids(parent);
        state.reindex(parent, &order);
        Ok(())
    }

    /// Make the next `move_category` call fail with `error`
    pub async fn fail_next_move(&self, error: DomainError) {
        self.state.lock().await.fail_next_move = Some(error);
    }

    /// Make the next `list_categories` call fail with `error`
    pub async fn fail_next_list(&self, error: DomainError) {
        self.state.lock().await.fail_next_list = Some(error);
    }

    /// Every move request received so far, including failed ones
    pub async fn move_calls(&self) -> Vec<MoveCategoryArgs> {
        self.state.lock().await.move_calls.clone()
    }

    pub async fn list_calls(&self) -> Vec<ListCategoriesArgs> {
        self.state.lock().await.list_calls.clone()
    }

    /// `(id, position)` pairs under `parent`, in order
    pub async fn positions(&self, parent: NodeId) -> Vec<(NodeId, u32)> {
        let state = self.state.lock().await;
        state
            .children_ids(parent)
            .into_iter()
            .filter_map(|id| state.find(id).map(|r| (r.id, r.position)))
            .collect()
    }
}

#[async_trait]
impl CategoryBackend for MemoryCategoryRepository {
    async fn list_categories(&self, args: &ListCategoriesArgs) -> DomainResult<Vec<CategoryRecord>> {
        let mut state = self.state.lock().await;
        state.list_calls.push(args.clone());
        if let Some(err) = state.fail_next_list.take() {
            return Err(err);
        }
        Ok(state.to_records(ROOT_ID, 1))
    }

    async fn move_category(&self, args: &MoveCategoryArgs) -> DomainResult<()> {
        let mut state = self.state.lock().await;
        state.move_calls.push(*args);
        if let Some(err) = state.fail_next_move.take() {
            return Err(err);
        }

        let id = args.id;
        let new_parent = args.move_parent;
        let old_parent = state
            .find(id)
            .map(|r| r.parent_id)
            .ok_or_else(|| DomainError::NotFound(format!("Category {} not found", id)))?;
        let parent_depth = if new_parent == ROOT_ID {
            0
        } else {
            state
                .depth_of(new_parent)
                .ok_or_else(|| DomainError::NotFound(format!("Category {} not found", new_parent)))?
        };
        if new_parent == id || state.is_descendant(new_parent, id) {
            return Err(DomainError::Conflict(format!(
                "Category {} cannot move under its own subtree",
                id
            )));
        }
        if args.move_depth != parent_depth + 1 {
            return Err(DomainError::InvalidInput(format!(
                "depth {} does not match parent depth {}",
                args.move_depth, parent_depth
            )));
        }
        if args.new_ordinal == 0 {
            return Err(DomainError::InvalidInput("ordinal is 1-based".to_string()));
        }

        // Take the row out of its old group, then insert into the new one
        let mut old_order = state.children_ids(old_parent);
        old_order.retain(|c| *c != id);
        if let Some(row) = state.rows.iter_mut().find(|r| r.id == id) {
            row.parent_id = new_parent;
        }
        state.reindex(old_parent, &old_order);

        let mut new_order = state.children_ids(new_parent);
        new_order.retain(|c| *c != id);
        let index = (args.new_ordinal as usize - 1).min(new_order.len());
        new_order.insert(index, id);
        state.reindex(new_parent, &new_order);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> MemoryCategoryRepository {
        MemoryCategoryRepository::from_records(vec![
            CategoryRecord::new(1, "a").with_children(vec![
                CategoryRecord::new(2, "b"),
                CategoryRecord::new(3, "c"),
                CategoryRecord::new(4, "d"),
            ]),
            CategoryRecord::new(5, "e"),
        ])
    }

    fn args(id: NodeId, move_depth: u8, move_parent: NodeId, new_ordinal: u32) -> MoveCategoryArgs {
        MoveCategoryArgs {
            id,
            move_depth,
            move_parent,
            new_ordinal,
        }
    }

    #[tokio::test]
    async fn move_within_parent_shifts_siblings() {
        let repo = repo();
        repo.move_category(&args(4, 2, 1, 1)).await.unwrap();
        assert_eq!(repo.positions(1).await, vec![(4, 1), (2, 2), (3, 3)]);
    }

    #[tokio::test]
    async fn move_across_parents_reindexes_both() {
        let repo = repo();
        repo.move_category(&args(3, 2, 5, 1)).await.unwrap();
        assert_eq!(repo.positions(1).await, vec![(2, 1), (4, 2)]);
        assert_eq!(repo.positions(5).await, vec![(3, 1)]);
    }

    #[tokio::test]
    async fn move_rejects_cycles_and_bad_depth() {
        let repo = repo();
        assert!(matches!(
            repo.move_category(&args(1, 3, 2, 1)).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            repo.move_category(&args(3, 3, 5, 1)).await,
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            repo.move_category(&args(42, 1, 0, 1)).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_returns_nested_records_in_order() {
        let repo = repo();
        let records = repo
            .list_categories(&ListCategoriesArgs { lang: "en".to_string() })
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        let children = records[0].children.as_ref().unwrap();
        let ids: Vec<_> = children.iter().filter_map(|r| r.id.as_node_id()).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(children[0].depth, Some(2));
        assert_eq!(repo.list_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn create_and_delete_keep_positions_contiguous() {
        let repo = repo();
        let id = repo.create("f", 1).await.unwrap();
        assert_eq!(id, 6);
        assert_eq!(repo.positions(1).await.last(), Some(&(6, 4)));

        repo.delete(3).await.unwrap();
        assert_eq!(repo.positions(1).await, vec![(2, 1), (4, 2), (6, 3)]);
    }

    #[tokio::test]
    async fn create_refuses_below_ceiling() {
        let repo = repo();
        let d3 = repo.create("x", 2).await.unwrap();
        let d4 = repo.create("y", d3).await.unwrap();
        assert!(matches!(repo.create("z", d4).await, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let repo = repo();
        repo.fail_next_move(DomainError::Internal("down".to_string())).await;
        assert!(repo.move_category(&args(4, 2, 1, 1)).await.is_err());
        assert!(repo.move_category(&args(4, 2, 1, 1)).await.is_ok());
        assert_eq!(repo.move_calls().await.len(), 2);
    }
}
