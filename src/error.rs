use thiserror::Error;

/// Errors raised by the goal calculator and the journal.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid {field}: {value} (must be a positive number)")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("log entry {0} already exists")]
    DuplicateEntry(String),

    #[error("log entry {0} not found")]
    UnknownEntry(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),
}
