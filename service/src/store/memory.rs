use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ReplaceOutcome, StoreError, TodoStore};
use crate::model::{with_id, TodoId, TodoItem};

/// Process-local store keyed by `TodoId`.
///
/// Identifiers are ObjectIds, which sort by creation time, so iterating the
/// map yields items in insertion order just like a fresh MongoDB collection.
/// Items are stored without `_id`; it is attached on the way out. Field
/// order is preserved, so a replacement that only reorders keys counts as a
/// modification, as it does in MongoDB.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<TodoId, TodoItem>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .map(|(id, item)| with_id(item.clone(), *id))
            .collect())
    }

    async fn insert(&self, item: TodoItem) -> Result<TodoId, StoreError> {
        let id = TodoId::generate();
        self.items.write().await.insert(id, item);
        Ok(id)
    }

    async fn find(&self, id: TodoId) -> Result<Option<TodoItem>, StoreError> {
        let items = self.items.read().await;
        Ok(items.get(&id).map(|item| with_id(item.clone(), id)))
    }

    async fn replace(&self, id: TodoId, item: TodoItem) -> Result<ReplaceOutcome, StoreError> {
        let mut items = self.items.write().await;
        let Some(stored) = items.get_mut(&id) else {
            return Ok(ReplaceOutcome::default());
        };
        // Key order counts, matching how MongoDB compares BSON documents.
        let modified = u64::from(!stored.iter().eq(item.iter()));
        *stored = item;
        Ok(ReplaceOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete(&self, id: TodoId) -> Result<u64, StoreError> {
        Ok(u64::from(self.items.write().await.remove(&id).is_some()))
    }
}
