//! Unit tests for the reminder subsystem.
#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod service_tests;
mod support;
