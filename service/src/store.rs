//! Document store abstraction.
//!
//! # Design
//! Every HTTP operation maps to exactly one call on `TodoStore`. The trait is
//! object safe so the router holds an `Arc<dyn TodoStore>` built once at
//! startup. `close` is called once, after the server has stopped accepting
//! requests, never per request.

mod memory;
mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{TodoId, TodoItem};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("document conversion failed: {0}")]
    Conversion(String),
}

/// Counts reported by a full-document replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceOutcome {
    /// Documents whose identifier matched the filter.
    pub matched: u64,
    /// Documents whose stored content actually changed.
    pub modified: u64,
}

#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    /// All items in natural store order, each with `_id` as a string.
    async fn list(&self) -> Result<Vec<TodoItem>, StoreError>;

    /// Insert `item` and return the identifier the store assigned.
    async fn insert(&self, item: TodoItem) -> Result<TodoId, StoreError>;

    async fn find(&self, id: TodoId) -> Result<Option<TodoItem>, StoreError>;

    /// Replace the whole document stored under `id` with `item`.
    async fn replace(&self, id: TodoId, item: TodoItem) -> Result<ReplaceOutcome, StoreError>;

    /// Delete the document stored under `id`, returning how many were removed.
    async fn delete(&self, id: TodoId) -> Result<u64, StoreError>;

    /// Release the underlying connection.
    async fn close(&self) {}
}
