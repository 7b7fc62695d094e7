//! Row store port for task persistence in the remote ledger sheet.

use crate::reminder::domain::{Task, TaskChanges, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// One positional record in the remote tabular store.
pub type SheetRow = Vec<String>;

/// Result type for row store operations.
pub type TaskRowStoreResult<T> = Result<T, TaskRowStoreError>;

/// Persistence contract against the remote tabular store.
///
/// The store is a small, append-mostly ledger addressed by the opaque task
/// id in column 0 and resolved by first-match linear scan. Row-level writes
/// are atomic on the remote side, but there is no cross-row transaction and
/// no concurrency token: concurrent writers race with last-write-wins per
/// column.
#[async_trait]
pub trait TaskRowStore: Send + Sync {
    /// Returns every row, including the header row at position 0.
    ///
    /// Callers must skip the header when hydrating tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRowStoreError::Unavailable`] when the store cannot be
    /// reached or the backing sheet does not exist.
    async fn list_rows(&self) -> TaskRowStoreResult<Vec<SheetRow>>;

    /// Serialises `task` into the fixed positional layout and appends it as
    /// a new row, returning the task id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRowStoreError::Unavailable`] on transport or store
    /// failure.
    async fn append_row(&self, task: &Task) -> TaskRowStoreResult<TaskId>;

    /// Overwrites the changed columns of the first row whose id column
    /// matches `id`, always refreshing the updated-at column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRowStoreError::NotFound`] when no row matches and
    /// [`TaskRowStoreError::Unavailable`] on transport failure.
    async fn update_row(&self, id: TaskId, changes: &TaskChanges) -> TaskRowStoreResult<()>;

    /// Removes the first row whose id column matches `id` outright; no
    /// tombstone is left behind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRowStoreError::NotFound`] when no row matches and
    /// [`TaskRowStoreError::Unavailable`] on transport failure.
    async fn delete_row(&self, id: TaskId) -> TaskRowStoreResult<()>;
}

/// Errors returned by row store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRowStoreError {
    /// No stored row carries the given task id.
    #[error("no stored row for task {0}")]
    NotFound(TaskId),

    /// The store or its transport failed; the operation may be retried.
    #[error("store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRowStoreError {
    /// Wraps a transport or backend failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
