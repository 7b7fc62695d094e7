//! Application services for reminder scheduling.

mod schedule;

pub use schedule::{
    CreateTaskRequest, TaskScheduleError, TaskScheduleResult, TaskScheduleService,
    UpdateTaskRequest,
};
