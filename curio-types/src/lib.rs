//! Core type definitions for Curio.
//!
//! This crate defines the addressing primitives shared by the storage and
//! mirroring layers:
//! - Document and user identifiers (UUID v7)
//! - The two document trees (a private tree per user, one public tree)
//! - Scope paths locating a collection inside a tree
//!
//! Record shapes (catalogs, items, attributes) live in `curio-model`.

mod ids;
mod scope;

pub use ids::{DocumentId, UserId};
pub use scope::{Level, ScopePath, Tree};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid scope: {0}")]
    InvalidScope(String),
}
