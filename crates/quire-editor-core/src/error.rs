//! Error types for editor operations.

use thiserror::Error;

/// Errors raised by the document model and its transactions.
///
/// None of these are fatal: callers log them and leave the document as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// A range that does not lie within the current document.
    #[error("range {from}..{to} does not lie within the document (size {size})")]
    OutOfRange { from: usize, to: usize, size: usize },

    /// A position that does not point into a textblock.
    #[error("position {pos} is not inside a textblock")]
    InvalidPosition { pos: usize },

    /// Platform layer failure (DOM lookups, coordinate queries).
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Error type for platform operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}
