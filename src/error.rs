// File: ./src/error.rs
//! Error types for schedule parsing and time arithmetic.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Day cell is not one of Po, Ut, St, Št, Pi, So, Ne
    #[error("Invalid day: '{0}'")]
    InvalidDay(String),

    /// Time cell is neither HH:MM nor HH:MM-HH:MM
    #[error("Invalid time format: '{0}'")]
    InvalidTimeFormat(String),

    /// Input could not be read as a table at all
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A clock string handed to the time arithmetic is not HH:MM
    #[error("Malformed time: '{0}'")]
    MalformedTime(String),

    #[error("Not enough cells: {found}, expected {expected}")]
    MissingCells { found: usize, expected: usize },
}
