//! Error types for list transformations and attribute storage.
use thiserror::Error;

/// Failure of a pure list operation.
///
/// The list the operation was called on is never modified, so callers can
/// keep using it after any of these errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("Index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field '{0}' is not a list")]
    NotAList(String),

    #[error("Field '{field}' expects a {expected} value")]
    TypeMismatch { field: String, expected: String },

    #[error("No template available for attribute '{0}'")]
    MissingTemplate(String),

    #[error("Invalid renumbering: {0}")]
    InvalidRenumber(String),

    #[error("Invalid direction: {0} (expected -1, +1, up or down)")]
    InvalidDirection(String),
}

/// Top-level error type for stores and the editor facade.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Locked: {0}")]
    Locked(String),

    #[error("Attribute not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    List(#[from] ListError),
}
