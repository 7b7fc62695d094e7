//! Scheduling engine for income and expense reminder tasks.

use crate::reminder::{
    domain::{
        Amount, Task, TaskChanges, TaskDomainError, TaskId, TaskKind, TaskTitle, UrgencyStatus,
        derive_status,
    },
    ports::{
        rows::{self, RowCodecError},
        store::{TaskRowStore, TaskRowStoreError},
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Request payload for creating a reminder task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    title: String,
    kind: TaskKind,
    amount: f64,
    note: Option<String>,
    due_date: NaiveDate,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        kind: TaskKind,
        amount: f64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            kind,
            amount,
            note: None,
            due_date,
        }
    }

    /// Attaches a free-text note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Partial-update request; unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    kind: Option<TaskKind>,
    amount: Option<f64>,
    note: Option<String>,
    due_date: Option<NaiveDate>,
    completed: Option<bool>,
}

impl UpdateTaskRequest {
    /// Creates an empty request that only refreshes the update timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the financial direction.
    #[must_use]
    pub const fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Replaces the amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Replaces the note; an empty value clears the stored note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Replaces the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the completion flag directly.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Service-level errors for schedule operations.
#[derive(Debug, Error)]
pub enum TaskScheduleError {
    /// Input validation failed; nothing was sent to the store.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// No task with the given id exists.
    #[error("no task found for id {0}")]
    NotFound(TaskId),

    /// The remote store could not complete the operation; local state is
    /// unchanged and the call may be retried.
    #[error(transparent)]
    Store(TaskRowStoreError),

    /// A stored row could not be decoded during hydration.
    #[error(transparent)]
    Codec(#[from] RowCodecError),
}

impl From<TaskRowStoreError> for TaskScheduleError {
    /// Store-level id misses surface as the service's own not-found kind.
    fn from(err: TaskRowStoreError) -> Self {
        match err {
            TaskRowStoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Result type for schedule service operations.
pub type TaskScheduleResult<T> = Result<T, TaskScheduleError>;

/// Scheduling engine owning the in-memory reminder collection.
///
/// The collection is reachable only through the operations below. Every
/// mutation persists to the row store first and commits locally only once
/// the store accepts, so a failed call leaves local state untouched and
/// the same logical operation may be retried safely. Write operations hold
/// the collection lock across the store call, serialising mutations.
#[derive(Clone)]
pub struct TaskScheduleService<S, C>
where
    S: TaskRowStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl<S, C> TaskScheduleService<S, C>
where
    S: TaskRowStore,
    C: Clock + Send + Sync,
{
    /// Creates a schedule service with an empty task collection.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            tasks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replaces the local collection with the tasks currently in the store.
    ///
    /// Skips the header row at position 0 and decodes every data row,
    /// preserving sheet order. Returns the number of tasks loaded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskScheduleError::Store`] when the store cannot be read
    /// and [`TaskScheduleError::Codec`] when a row does not match the
    /// contract layout; the local collection is unchanged in both cases.
    pub async fn refresh(&self) -> TaskScheduleResult<usize> {
        let sheet = self.store.list_rows().await?;
        let mut loaded = Vec::new();
        for row in sheet.iter().skip(1) {
            loaded.push(rows::decode(row)?);
        }
        let mut tasks = self.tasks.write().await;
        *tasks = loaded;
        debug!(count = tasks.len(), "hydrated reminder tasks from store");
        Ok(tasks.len())
    }

    /// Validates and creates a new reminder task.
    ///
    /// The task is appended to the remote store before it becomes visible
    /// in [`Self::list`]; a store failure therefore leaves no local trace,
    /// and a retry allocates a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskScheduleError::Validation`] for an empty title or a
    /// non-positive amount and [`TaskScheduleError::Store`] when the
    /// append fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskScheduleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let amount = Amount::new(request.amount)?;
        let task = Task::new(
            title,
            request.kind,
            amount,
            request.due_date,
            request.note,
            &*self.clock,
        );

        let mut tasks = self.tasks.write().await;
        self.store.append_row(&task).await?;
        tasks.push(task.clone());
        info!(task_id = %task.id(), kind = task.kind().as_str(), "created reminder task");
        Ok(task)
    }

    /// Applies a partial update to an existing task.
    ///
    /// Supplied fields are validated with the same rules as creation; the
    /// update timestamp is always refreshed, even for an empty request.
    /// Only the changed columns are written to the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskScheduleError::NotFound`] for an unknown id,
    /// [`TaskScheduleError::Validation`] for an invalid field value and
    /// [`TaskScheduleError::Store`] when persistence fails.
    pub async fn update(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskScheduleResult<Task> {
        let changes = self.validated_changes(request)?;
        let mut tasks = self.tasks.write().await;
        let index = position_of(&tasks, id).ok_or(TaskScheduleError::NotFound(id))?;
        self.store.update_row(id, &changes).await?;
        let task = tasks.get_mut(index).ok_or(TaskScheduleError::NotFound(id))?;
        task.apply(&changes);
        debug!(task_id = %id, "updated reminder task");
        Ok(task.clone())
    }

    /// Flips the completion flag, refreshing the update timestamp.
    ///
    /// The store receives the localised completion label derived from the
    /// new flag. Toggling twice restores the original flag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskScheduleError::NotFound`] for an unknown id and
    /// [`TaskScheduleError::Store`] when persistence fails.
    pub async fn toggle_complete(&self, id: TaskId) -> TaskScheduleResult<Task> {
        let mut tasks = self.tasks.write().await;
        let index = position_of(&tasks, id).ok_or(TaskScheduleError::NotFound(id))?;
        let task = tasks.get_mut(index).ok_or(TaskScheduleError::NotFound(id))?;
        let mut changes = TaskChanges::at(self.clock.utc());
        changes.completed = Some(!task.completed());
        self.store.update_row(id, &changes).await?;
        task.apply(&changes);
        debug!(task_id = %id, completed = task.completed(), "toggled reminder completion");
        Ok(task.clone())
    }

    /// Deletes a task locally and from the remote store.
    ///
    /// An unknown id fails before any store traffic, so the remote sheet
    /// is never touched for ids this engine does not know.
    ///
    /// # Errors
    ///
    /// Returns [`TaskScheduleError::NotFound`] for an unknown id and
    /// [`TaskScheduleError::Store`] when the remote delete fails.
    pub async fn delete(&self, id: TaskId) -> TaskScheduleResult<()> {
        let mut tasks = self.tasks.write().await;
        let index = position_of(&tasks, id).ok_or(TaskScheduleError::NotFound(id))?;
        self.store.delete_row(id).await?;
        tasks.remove(index);
        info!(task_id = %id, "deleted reminder task");
        Ok(())
    }

    /// Returns the current tasks in presentation order.
    ///
    /// Incomplete tasks come first, each group ascending by due date;
    /// tasks sharing a due date keep their insertion order. The order is a
    /// view recomputed on every call, never persisted.
    pub async fn list(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut view = tasks.clone();
        view.sort_by_key(|task| (task.completed(), task.due_date()));
        view
    }

    /// Derives the urgency of `task` for the clock's current local day.
    #[must_use]
    pub fn status_of(&self, task: &Task) -> UrgencyStatus {
        derive_status(task, self.clock.local().date_naive())
    }

    /// Converts a raw update request into validated task changes.
    fn validated_changes(&self, request: UpdateTaskRequest) -> TaskScheduleResult<TaskChanges> {
        let mut changes = TaskChanges::at(self.clock.utc());
        if let Some(title) = request.title {
            changes.title = Some(TaskTitle::new(title)?);
        }
        changes.kind = request.kind;
        if let Some(amount) = request.amount {
            changes.amount = Some(Amount::new(amount)?);
        }
        if let Some(note) = request.note {
            changes.set_note(Some(note));
        }
        changes.due_date = request.due_date;
        changes.completed = request.completed;
        Ok(changes)
    }
}

/// First task with the given id in insertion order.
fn position_of(tasks: &[Task], id: TaskId) -> Option<usize> {
    tasks.iter().position(|task| task.id() == id)
}
