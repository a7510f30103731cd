//! Error types for planner-engine operations.
//!
//! The scheduling algorithms themselves are infallible. Errors only come from
//! the strict parsers and from JSON at the crate boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid ISO weekday {0} (expected 1..=7)")]
    InvalidWeekday(u8),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
