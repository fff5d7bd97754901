//! Error types for the export boundary.
//!
//! Generation itself cannot fail; these cover the request envelope around it.

use thiserror::Error;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Error, Debug)]
pub enum ExportError {
    /// `nodes` is missing or not an array. A client error.
    #[error("Invalid input: nodes array is required")]
    InvalidInput,

    /// An element of `nodes` could not be read as a node. A server error.
    #[error("node {index} is malformed: {message}")]
    MalformedNode { index: usize, message: String },

    /// The request body is not JSON at all.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExportError {
    /// Whether the caller, rather than generation, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExportError::InvalidInput | ExportError::Json(_))
    }
}
