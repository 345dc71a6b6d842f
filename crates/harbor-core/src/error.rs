//! Error handling for the Harbor conversion library.

use thiserror::Error;

/// Result type for Harbor conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Harbor conversion operations.
///
/// Failures local to one capture entry or one capture document are handled
/// inline by the merge session and never surface here; this type covers the
/// document-level reads and the final write, which are the only fatal points
/// of a run.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure while reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be parsed or serialized as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
