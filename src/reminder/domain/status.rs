//! Read-time urgency derivation for reminder tasks.

use super::Task;
use chrono::{Locale, NaiveDate};

/// Urgency bucket of a task as seen on a given calendar day.
///
/// Derived on every read and never stored, so a passing midnight moves a
/// task from "พรุ่งนี้" to "วันนี้" without any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyStatus {
    /// The task is done; completion overrides every date bucket.
    Completed,
    /// The due date lies strictly before the reference day.
    Overdue,
    /// Due on the reference day itself.
    DueToday,
    /// Due on the day immediately after the reference day.
    DueTomorrow,
    /// Due within the next week; carries the whole-day distance (2..=7).
    DueInDays(i64),
    /// Due further out; carries the date for display.
    Scheduled(NaiveDate),
}

impl UrgencyStatus {
    /// Thai badge label shown next to the task.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Completed => "เสร็จแล้ว".to_owned(),
            Self::Overdue => "เกินกำหนด".to_owned(),
            Self::DueToday => "วันนี้".to_owned(),
            Self::DueTomorrow => "พรุ่งนี้".to_owned(),
            Self::DueInDays(days) => format!("อีก {days} วัน"),
            Self::Scheduled(date) => date
                .format_localized("%d %b", Locale::th_TH)
                .to_string(),
        }
    }

    /// Stable class token the presentation layer maps to badge colours.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Completed => "status-completed",
            Self::Overdue => "status-overdue",
            Self::DueToday => "status-due-today",
            Self::DueTomorrow => "status-due-tomorrow",
            Self::DueInDays(_) => "status-upcoming",
            Self::Scheduled(_) => "status-scheduled",
        }
    }
}

/// Derives the urgency of `task` as seen on the calendar day `on`.
///
/// Matching is first-match-wins in declaration order and exactly one bucket
/// applies. Distances are whole calendar days, never clock-time deltas, so
/// a task due on the next calendar day is "tomorrow" even when fewer than
/// 24 hours remain.
#[must_use]
pub fn derive_status(task: &Task, on: NaiveDate) -> UrgencyStatus {
    if task.completed() {
        return UrgencyStatus::Completed;
    }
    let due = task.due_date();
    match due.signed_duration_since(on).num_days() {
        days if days < 0 => UrgencyStatus::Overdue,
        0 => UrgencyStatus::DueToday,
        1 => UrgencyStatus::DueTomorrow,
        days @ 2..=7 => UrgencyStatus::DueInDays(days),
        _ => UrgencyStatus::Scheduled(due),
    }
}
