//! Error types for the redirect engine
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RedirectError
pub type Result<T> = std::result::Result<T, RedirectError>;

/// Unified error type for redirect engine operations
#[derive(Debug, Error)]
pub enum RedirectError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Mutation Errors (recoverable at the admin boundary)
    // -------------------------------------------------------------------------
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Request URL already exists at index {position}")]
    DuplicateKey { position: usize },

    #[error("Selector did not resolve to an entry")]
    SelectorNotFound,

    #[error("Index {position} is out of range for {len} entries")]
    OutOfRange { position: usize, len: usize },

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Store corrupt: {0}")]
    StoreCorrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Boundary Errors
    // -------------------------------------------------------------------------
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    #[error("Server error: {0}")]
    Server(String),
}

impl RedirectError {
    /// True for errors caused by the caller's input rather than the store.
    ///
    /// These are reported as a structured failure; everything else is fatal
    /// for the request being served.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RedirectError::MissingField(_)
                | RedirectError::DuplicateKey { .. }
                | RedirectError::SelectorNotFound
                | RedirectError::OutOfRange { .. }
                | RedirectError::InvalidRequest(_)
        )
    }
}

impl From<bincode::Error> for RedirectError {
    fn from(e: bincode::Error) -> Self {
        RedirectError::Serialization(e.to_string())
    }
}
