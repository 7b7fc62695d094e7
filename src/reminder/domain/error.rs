//! Error types for reminder domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The amount is zero, negative, or not a finite number.
    #[error("invalid amount {0}, expected a finite number greater than zero")]
    InvalidAmount(f64),
}

impl TaskDomainError {
    /// Names the input field that failed validation, so callers can attach
    /// the failure to the right form control.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::InvalidAmount(_) => "amount",
        }
    }
}

/// Error returned while parsing task kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task kind: {0}")]
pub struct ParseTaskKindError(pub String);
