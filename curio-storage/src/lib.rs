//! Document storage for Curio.
//!
//! Stores catalogs, items and attributes of both trees as JSON documents
//! addressed by `(ScopePath, DocumentId)`.
//!
//! # Architecture
//!
//! - [`EntityStore`] is the async contract every backend implements; all of
//!   its operations touch exactly one document
//! - [`MemoryStore`] keeps collections in process (tests, embedders)
//! - [`SqliteStore`] persists every document as a row of a single table
//! - [`StoreConfig`] selects and opens a backend
//!
//! Stores know nothing about mirroring. They do refuse to create a document
//! whose parent document is missing, which keeps both trees free of orphans
//! at creation time.

mod config;
mod error;
mod memory;
mod sqlite;
mod store;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use store::{EntityStore, RecordStoreExt};

/// Current time in unix milliseconds, used for document timestamps.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
