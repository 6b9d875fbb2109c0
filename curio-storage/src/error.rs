//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Target document (or the parent of a document being created) is absent.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The backend is temporarily unreachable or busy. Safe to retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The caller may not touch this document.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Scope does not match the record or operation.
    #[error("invalid scope: {0}")]
    InvalidScope(String),

    /// Document data is not a JSON object or cannot be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error from SQLite that maps to none of the above.
    #[error("database error: {0}")]
    Database(rusqlite::Error),
}

impl StoreError {
    /// True for errors that say the target document does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// True for errors a caller may retry unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;

        if let rusqlite::Error::SqliteFailure(failure, _) = &err {
            match failure.code {
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
                    return StoreError::Unavailable(err.to_string());
                }
                ErrorCode::ReadOnly
                | ErrorCode::PermissionDenied
                | ErrorCode::AuthorizationForStatementDenied => {
                    return StoreError::PermissionDenied(err.to_string());
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl From<curio_types::Error> for StoreError {
    fn from(err: curio_types::Error) -> Self {
        match err {
            curio_types::Error::Serialization(e) => StoreError::Serialization(e),
            other => StoreError::InvalidScope(other.to_string()),
        }
    }
}
