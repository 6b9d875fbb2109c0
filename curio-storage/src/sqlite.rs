//! SQLite-backed document store.
//!
//! Every document of both trees is one row of the `documents` table, keyed by
//! the rendered scope path and the document id. Queries run on tokio's
//! blocking pool.

use crate::error::{StoreError, StoreResult};
use crate::now_millis;
use crate::store::{missing, missing_parent, require_object, EntityStore};
use async_trait::async_trait;
use curio_model::{Document, Patch};
use curio_types::{DocumentId, ScopePath};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Persistent store backed by SQLite.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "
                CREATE TABLE IF NOT EXISTS documents (
                    scope TEXT NOT NULL,
                    id TEXT NOT NULL,
                    data TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    modified_at INTEGER NOT NULL,
                    PRIMARY KEY (scope, id)
                );
                ",
            )?;
            Ok(())
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> StoreResult<T>) -> StoreResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))?;
        f(&conn)
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        let result = tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))?;
            f(&conn)
        })
        .await;
        match result {
            Ok(inner) => inner,
            Err(e) => Err(StoreError::Unavailable(format!("sqlite task failed: {e}"))),
        }
    }

    fn read_row(
        conn: &Connection,
        scope: &str,
        id: DocumentId,
    ) -> StoreResult<Option<(String, i64, i64)>> {
        let row = conn
            .query_row(
                "SELECT data, created_at, modified_at FROM documents WHERE scope = ?1 AND id = ?2",
                params![scope, id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(row)
    }

    fn exists(conn: &Connection, scope: &str, id: DocumentId) -> StoreResult<bool> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM documents WHERE scope = ?1 AND id = ?2",
                params![scope, id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create(&self, scope: &ScopePath, data: serde_json::Value) -> StoreResult<DocumentId> {
        require_object(scope, &data)?;
        let json = serde_json::to_string(&data)?;
        let scope = scope.clone();
        self.run(move |conn| {
            if let Some((parent_scope, parent_id)) = scope.parent() {
                if !Self::exists(conn, &parent_scope.to_string(), parent_id)? {
                    return Err(missing_parent(&scope));
                }
            }

            let id = DocumentId::new();
            let now = now_millis();
            conn.execute(
                "INSERT INTO documents (scope, id, data, created_at, modified_at) VALUES (?1, ?2, ?3, ?4, ?4)",
                params![scope.to_string(), id.to_string(), json, now],
            )?;
            Ok(id)
        })
        .await
    }

    async fn update(&self, scope: &ScopePath, id: DocumentId, patch: &Patch) -> StoreResult<()> {
        let key = scope.to_string();
        let scope = scope.clone();
        let patch = patch.clone();
        self.run(move |conn| {
            let (raw, _, _) = Self::read_row(conn, &key, id)?.ok_or_else(|| missing(&scope, id))?;
            let mut data: serde_json::Value = serde_json::from_str(&raw)?;
            patch.apply_to(&mut data);
            conn.execute(
                "UPDATE documents SET data = ?1, modified_at = ?2 WHERE scope = ?3 AND id = ?4",
                params![serde_json::to_string(&data)?, now_millis(), key, id.to_string()],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<()> {
        let scope = scope.clone();
        self.run(move |conn| {
            let removed = conn.execute(
                "DELETE FROM documents WHERE scope = ?1 AND id = ?2",
                params![scope.to_string(), id.to_string()],
            )?;
            if removed == 0 {
                return Err(missing(&scope, id));
            }
            Ok(())
        })
        .await
    }

    async fn get(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<Document> {
        let scope = scope.clone();
        self.run(move |conn| {
            let (raw, created_at, modified_at) = Self::read_row(conn, &scope.to_string(), id)?
                .ok_or_else(|| missing(&scope, id))?;
            Ok(Document {
                id,
                data: serde_json::from_str(&raw)?,
                created_at,
                modified_at,
            })
        })
        .await
    }

    async fn list(&self, scope: &ScopePath) -> StoreResult<Vec<Document>> {
        let scope = scope.clone();
        self.run(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, data, created_at, modified_at FROM documents WHERE scope = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map(params![scope.to_string()], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(id, raw, created_at, modified_at)| {
                    let id = DocumentId::parse(&id).map_err(|e| {
                        StoreError::InvalidData(format!("bad document id {id} in {scope}: {e}"))
                    })?;
                    Ok(Document {
                        id,
                        data: serde_json::from_str(&raw)?,
                        created_at,
                        modified_at,
                    })
                })
                .collect()
        })
        .await
    }
}
