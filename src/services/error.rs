//! Error types for collaborator services
//!
//! - **`ServiceError`**: a rejected call to the reference data or update service
//! - **`StoreError`**: a failed write to (or open of) the key-value persistence store

use thiserror::Error;

/// A remote call that was rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The service answered but refused the request
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The service could not be reached
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// The service answered with something that is not a record list
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Persistence store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// The in-memory store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
