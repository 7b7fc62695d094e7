//! Domain model for reminder tasks.
//!
//! The reminder domain models task creation, partial updates, completion
//! toggling and read-time urgency derivation while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskKindError, TaskDomainError};
pub use ids::{Amount, TaskId, TaskTitle};
pub use status::{UrgencyStatus, derive_status};
pub use task::{PersistedTaskData, Task, TaskChanges, TaskKind};
