//! Task aggregate root and partial-update value object.

use super::{Amount, ParseTaskKindError, TaskId, TaskTitle};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Financial direction of a reminder task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Money expected to come in.
    Income,
    /// Money expected to go out.
    Expense,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}

/// Reminder task aggregate root.
///
/// Urgency is never stored on the task; it is derived at read time from
/// `due_date`, `completed` and the current calendar day so a passing day
/// boundary can never leave a stale label behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    kind: TaskKind,
    amount: Amount,
    note: Option<String>,
    due_date: NaiveDate,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted financial direction.
    pub kind: TaskKind,
    /// Persisted amount.
    pub amount: Amount,
    /// Persisted note, if any.
    pub note: Option<String>,
    /// Persisted due date.
    pub due_date: NaiveDate,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new incomplete task with a fresh identifier.
    ///
    /// Both timestamps are taken from a single clock reading; an empty or
    /// whitespace-only note is dropped.
    #[must_use]
    pub fn new(
        title: TaskTitle,
        kind: TaskKind,
        amount: Amount,
        due_date: NaiveDate,
        note: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title,
            kind,
            amount,
            note: normalise_note(note),
            due_date,
            completed: false,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            kind: data.kind,
            amount: data.amount,
            note: data.note,
            due_date: data.due_date,
            completed: data.completed,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the financial direction.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the attached amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the free-text note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns whether the task has been completed.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// Fields left unset in `changes` keep their current value; the
    /// identifier and creation timestamp never change. The mutation
    /// timestamp is always taken from `changes`, even when no field is set.
    pub fn apply(&mut self, changes: &TaskChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(kind) = changes.kind {
            self.kind = kind;
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(note) = &changes.note {
            self.note = note.clone();
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.updated_at = changes.updated_at;
    }
}

/// Partial update applied to a task and persisted column by column.
///
/// Unset fields are left untouched both locally and in the store; the
/// refreshed mutation timestamp is mandatory and written on every update.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChanges {
    /// Replacement title, if the title changed.
    pub title: Option<TaskTitle>,
    /// Replacement financial direction, if it changed.
    pub kind: Option<TaskKind>,
    /// Replacement amount, if it changed.
    pub amount: Option<Amount>,
    /// Replacement note: `Some(None)` clears it, `None` leaves it alone.
    pub note: Option<Option<String>>,
    /// Replacement due date, if it changed.
    pub due_date: Option<NaiveDate>,
    /// Replacement completion flag, if it changed.
    pub completed: Option<bool>,
    /// Refreshed mutation timestamp, written unconditionally.
    pub updated_at: DateTime<Utc>,
}

impl TaskChanges {
    /// Creates an empty change set stamped with `updated_at`.
    #[must_use]
    pub const fn at(updated_at: DateTime<Utc>) -> Self {
        Self {
            title: None,
            kind: None,
            amount: None,
            note: None,
            due_date: None,
            completed: None,
            updated_at,
        }
    }

    /// Sets the note change, dropping empty or whitespace-only values.
    pub fn set_note(&mut self, note: Option<String>) {
        self.note = Some(normalise_note(note));
    }
}

/// Drops empty or whitespace-only notes and trims the rest.
fn normalise_note(note: Option<String>) -> Option<String> {
    note.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
