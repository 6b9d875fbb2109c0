//! Backend selection.

use crate::error::StoreResult;
use crate::{EntityStore, MemoryStore, SqliteStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Which backend to open, as read from configuration.
///
/// ```json
/// { "backend": "sqlite", "path": "/var/lib/curio/documents.db" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Process-local store; contents are lost on exit.
    #[default]
    Memory,
    /// SQLite database file, created if missing.
    Sqlite { path: PathBuf },
}

impl StoreConfig {
    /// Opens the configured backend.
    pub fn open(&self) -> StoreResult<Arc<dyn EntityStore>> {
        match self {
            StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreConfig::Sqlite { path } => Ok(Arc::new(SqliteStore::open(path)?)),
        }
    }
}
