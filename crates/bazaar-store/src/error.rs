//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to the content store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Store unreachable: {0}")]
    Connection(String),

    /// The store answered but refused the request.
    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A mutation targeted a document that does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),

    /// A create collided with an existing document id.
    #[error("Document already exists: {0}")]
    Conflict(String),

    /// A document or patch was malformed for the requested operation.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Failed to (de)serialize a document.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Failed to read or write the local snapshot.
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => StoreError::Rejected {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None if e.is_decode() => StoreError::Serialization(e.to_string()),
            None => StoreError::Connection(e.to_string()),
        }
    }
}
