//! In-memory sheet store modelling the remote spreadsheet tab.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::reminder::{
    domain::{Task, TaskChanges, TaskId},
    ports::{
        rows,
        store::{SheetRow, TaskRowStore, TaskRowStoreError, TaskRowStoreResult},
    },
};

/// Thread-safe in-memory row store.
///
/// Keeps rows in sheet order with the header at position 0 and resolves
/// ids by first-match linear scan, matching the behaviour of the remote
/// spreadsheet tab it stands in for. Used as the test backend and for
/// local runs without a configured sheet endpoint.
#[derive(Debug, Clone)]
pub struct InMemorySheetStore {
    rows: Arc<RwLock<Vec<SheetRow>>>,
}

impl InMemorySheetStore {
    /// Creates a store holding only the header row.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(vec![rows::header_row()])),
        }
    }

    /// Creates a store with pre-existing task rows below the header.
    #[must_use]
    pub fn with_rows(seeded: impl IntoIterator<Item = SheetRow>) -> Self {
        let mut all = vec![rows::header_row()];
        all.extend(seeded);
        Self {
            rows: Arc::new(RwLock::new(all)),
        }
    }
}

impl Default for InMemorySheetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// First data row whose id column matches, skipping the header.
fn position_of(sheet: &[SheetRow], id: TaskId) -> Option<usize> {
    let id_text = id.to_string();
    sheet
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, row)| row.get(rows::COL_ID).is_some_and(|cell| *cell == id_text))
        .map(|(index, _)| index)
}

#[async_trait]
impl TaskRowStore for InMemorySheetStore {
    async fn list_rows(&self) -> TaskRowStoreResult<Vec<SheetRow>> {
        let sheet = self.rows.read().map_err(|err| {
            TaskRowStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(sheet.clone())
    }

    async fn append_row(&self, task: &Task) -> TaskRowStoreResult<TaskId> {
        let mut sheet = self.rows.write().map_err(|err| {
            TaskRowStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        sheet.push(rows::encode(task));
        Ok(task.id())
    }

    async fn update_row(&self, id: TaskId, changes: &TaskChanges) -> TaskRowStoreResult<()> {
        let mut sheet = self.rows.write().map_err(|err| {
            TaskRowStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let index = position_of(&sheet, id).ok_or(TaskRowStoreError::NotFound(id))?;
        let row = sheet.get_mut(index).ok_or(TaskRowStoreError::NotFound(id))?;
        rows::apply_changes(row, changes);
        Ok(())
    }

    async fn delete_row(&self, id: TaskId) -> TaskRowStoreResult<()> {
        let mut sheet = self.rows.write().map_err(|err| {
            TaskRowStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let index = position_of(&sheet, id).ok_or(TaskRowStoreError::NotFound(id))?;
        sheet.remove(index);
        Ok(())
    }
}
