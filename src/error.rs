//! Error types for the record store.

use thiserror::Error;

/// Main error type for codec operations.
///
/// Store mutations and navigation queries never return errors; a missing or
/// wrong-kind record is an ordinary `None`/empty result. Errors only arise
/// at the load/save boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt file: stream truncated at byte {offset}")]
    Truncated { offset: usize },

    #[error("Not a valid database file: {0}")]
    InvalidValue(String),

    #[error("Field {field} cannot be saved: expected {expected} data, got {got}")]
    FieldShapeMismatch {
        field: u64,
        expected: &'static str,
        got: &'static str,
    },
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, StoreError>;
