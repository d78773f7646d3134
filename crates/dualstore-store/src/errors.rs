//! Error helpers for dualstore-store
//!
//! Wraps dualstore-core ExError with store-specific constructors

use dualstore_core::errors::{DualStoreError, ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an error for a stored attribute blob that is not valid JSON
pub fn corrupt_attributes(model_name: &str, id: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("sqlite_read")
        .with_model_name(model_name)
        .with_record_id(id)
        .with_message(err.to_string())
}

/// Create an error for attributes that cannot be encoded
pub fn encode_attributes(model_name: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op("sqlite_write")
        .with_model_name(model_name)
        .with_message(err.to_string())
}

/// Create an error for a poisoned in-memory lock
pub fn lock_poisoned(resource: &str) -> ExError {
    DualStoreError::LockPoisoned {
        resource: resource.to_string(),
    }
    .into()
}
