//! Bidirectional mapping between [`Task`] and the positional sheet row.
//!
//! The row layout is part of the external store contract: nine columns in a
//! fixed order, preceded by a header row at position 0. Keeping the mapping
//! at the port boundary stops positional indices from leaking into the
//! domain model.

use super::store::SheetRow;
use crate::reminder::domain::{
    Amount, PersistedTaskData, Task, TaskChanges, TaskId, TaskKind, TaskTitle,
};
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Column position of the task id.
pub const COL_ID: usize = 0;
/// Column position of the title.
pub const COL_TITLE: usize = 1;
/// Column position of the financial direction.
pub const COL_KIND: usize = 2;
/// Column position of the amount.
pub const COL_AMOUNT: usize = 3;
/// Column position of the note; empty when the task has none.
pub const COL_NOTE: usize = 4;
/// Column position of the due date (ISO-8601 calendar date).
pub const COL_DUE_DATE: usize = 5;
/// Column position of the localised completion label.
pub const COL_COMPLETED: usize = 6;
/// Column position of the creation timestamp (RFC 3339).
pub const COL_CREATED_AT: usize = 7;
/// Column position of the latest mutation timestamp (RFC 3339).
pub const COL_UPDATED_AT: usize = 8;
/// Number of columns in a task row.
pub const COLUMN_COUNT: usize = 9;

/// Localised completion label written for finished tasks.
pub const DONE_LABEL: &str = "เสร็จแล้ว";
/// Localised completion label written for open tasks.
pub const PENDING_LABEL: &str = "รอดำเนินการ";

/// Column titles of the header row, in contract order.
const HEADER_TITLES: [&str; COLUMN_COUNT] = [
    "ID",
    "รายการ",
    "ประเภท",
    "ยอดเงิน",
    "หมายเหตุ",
    "กำหนดวัน",
    "สถานะ",
    "สร้างเมื่อ",
    "แก้ไขเมื่อ",
];

/// Builds the header row the sheet carries at position 0.
#[must_use]
pub fn header_row() -> SheetRow {
    HEADER_TITLES.iter().map(|title| (*title).to_owned()).collect()
}

/// Returns the completion label for a completion flag.
#[must_use]
pub const fn completion_label(completed: bool) -> &'static str {
    if completed { DONE_LABEL } else { PENDING_LABEL }
}

/// Parses a stored completion label back into the flag.
///
/// # Errors
///
/// Returns [`RowCodecError::UnknownCompletionLabel`] for anything other
/// than the two contract labels.
pub fn parse_completion_label(value: &str) -> Result<bool, RowCodecError> {
    match value {
        DONE_LABEL => Ok(true),
        PENDING_LABEL => Ok(false),
        other => Err(RowCodecError::UnknownCompletionLabel(other.to_owned())),
    }
}

/// Serialises a task into the fixed positional layout.
#[must_use]
pub fn encode(task: &Task) -> SheetRow {
    vec![
        task.id().to_string(),
        task.title().as_str().to_owned(),
        task.kind().as_str().to_owned(),
        task.amount().to_string(),
        task.note().unwrap_or_default().to_owned(),
        task.due_date().to_string(),
        completion_label(task.completed()).to_owned(),
        task.created_at().to_rfc3339(),
        task.updated_at().to_rfc3339(),
    ]
}

/// Rebuilds a task from a stored row.
///
/// # Errors
///
/// Returns a [`RowCodecError`] naming the first column that does not match
/// the contract layout.
pub fn decode(row: &SheetRow) -> Result<Task, RowCodecError> {
    let raw_id = column(row, COL_ID)?;
    let id = Uuid::parse_str(raw_id)
        .map(TaskId::from_uuid)
        .map_err(|_| RowCodecError::InvalidId(raw_id.to_owned()))?;
    let title = TaskTitle::new(column(row, COL_TITLE)?).map_err(|_| RowCodecError::EmptyTitle)?;
    let kind = TaskKind::try_from(column(row, COL_KIND)?)
        .map_err(|err| RowCodecError::UnknownKind(err.0))?;
    let raw_amount = column(row, COL_AMOUNT)?;
    let amount = raw_amount
        .parse::<f64>()
        .ok()
        .and_then(|value| Amount::new(value).ok())
        .ok_or_else(|| RowCodecError::InvalidAmount(raw_amount.to_owned()))?;
    let note_cell = column(row, COL_NOTE)?;
    let note = if note_cell.is_empty() {
        None
    } else {
        Some(note_cell.to_owned())
    };
    let raw_due = column(row, COL_DUE_DATE)?;
    let due_date = raw_due
        .parse::<NaiveDate>()
        .map_err(|_| RowCodecError::InvalidDueDate(raw_due.to_owned()))?;
    let completed = parse_completion_label(column(row, COL_COMPLETED)?)?;
    let created_at = timestamp(column(row, COL_CREATED_AT)?)?;
    let updated_at = timestamp(column(row, COL_UPDATED_AT)?)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id,
        title,
        kind,
        amount,
        note,
        due_date,
        completed,
        created_at,
        updated_at,
    }))
}

/// Overwrites the columns named by `changes`, always refreshing the
/// updated-at column. Columns beyond the row's length are skipped.
pub fn apply_changes(row: &mut SheetRow, changes: &TaskChanges) {
    if let Some(title) = &changes.title {
        write_cell(row, COL_TITLE, title.as_str().to_owned());
    }
    if let Some(kind) = changes.kind {
        write_cell(row, COL_KIND, kind.as_str().to_owned());
    }
    if let Some(amount) = changes.amount {
        write_cell(row, COL_AMOUNT, amount.to_string());
    }
    if let Some(note) = &changes.note {
        write_cell(row, COL_NOTE, note.clone().unwrap_or_default());
    }
    if let Some(due_date) = changes.due_date {
        write_cell(row, COL_DUE_DATE, due_date.to_string());
    }
    if let Some(completed) = changes.completed {
        write_cell(row, COL_COMPLETED, completion_label(completed).to_owned());
    }
    write_cell(row, COL_UPDATED_AT, changes.updated_at.to_rfc3339());
}

/// Errors returned while decoding stored rows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RowCodecError {
    /// The row is shorter than the fixed column layout.
    #[error("row is missing column {0}")]
    MissingColumn(usize),

    /// Column 0 does not hold a well-formed task id.
    #[error("invalid task id '{0}'")]
    InvalidId(String),

    /// The title column is empty.
    #[error("title column must not be empty")]
    EmptyTitle,

    /// The kind column holds neither "income" nor "expense".
    #[error("unknown task kind '{0}'")]
    UnknownKind(String),

    /// The amount column does not hold a positive finite number.
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    /// The due-date column does not hold an ISO-8601 calendar date.
    #[error("invalid due date '{0}'")]
    InvalidDueDate(String),

    /// The status column holds neither completion label.
    #[error("unknown completion label '{0}'")]
    UnknownCompletionLabel(String),

    /// A timestamp column does not hold an RFC 3339 timestamp.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),
}

fn column(row: &SheetRow, index: usize) -> Result<&str, RowCodecError> {
    row.get(index)
        .map(String::as_str)
        .ok_or(RowCodecError::MissingColumn(index))
}

fn timestamp(value: &str) -> Result<DateTime<Utc>, RowCodecError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RowCodecError::InvalidTimestamp(value.to_owned()))
}

fn write_cell(row: &mut SheetRow, index: usize, value: String) {
    if let Some(cell) = row.get_mut(index) {
        *cell = value;
    }
}
