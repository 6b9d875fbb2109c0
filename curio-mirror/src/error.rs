//! Error types for the mirroring layer.

use crate::policy::{classify, ErrorClass};
use curio_storage::StoreError;
use thiserror::Error;

/// Result type for mirroring operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors that can occur in mirroring operations.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Storage error, private or public tree.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A mirror could not be created because its parent mirror is gone.
    #[error("parent mirror missing for {0}")]
    MissingParentMirror(String),

    /// Scope construction error.
    #[error("scope error: {0}")]
    Scope(#[from] curio_types::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MirrorError {
    /// Classification used to decide between retrying and giving up.
    pub fn class(&self) -> ErrorClass {
        match self {
            MirrorError::Store(err) => classify(err),
            MirrorError::MissingParentMirror(_) => ErrorClass::OrphanedLink,
            _ => ErrorClass::Terminal,
        }
    }

    /// True if re-running the same call unchanged may succeed.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MirrorError::Store(err) if err.is_not_found())
    }
}
