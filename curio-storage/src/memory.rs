//! In-process document store.

use crate::error::StoreResult;
use crate::now_millis;
use crate::store::{missing, missing_parent, require_object, EntityStore};
use async_trait::async_trait;
use curio_model::{Document, Patch};
use curio_types::{DocumentId, ScopePath};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

type Collection = BTreeMap<DocumentId, Document>;

/// Document store kept entirely in memory.
///
/// Collections are keyed by scope path; documents inside a collection are
/// ordered by id.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<ScopePath, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of documents across every collection of both trees.
    pub async fn document_count(&self) -> usize {
        self.collections.read().await.values().map(BTreeMap::len).sum()
    }

    /// Number of documents held by the public tree.
    pub async fn public_document_count(&self) -> usize {
        self.collections
            .read()
            .await
            .iter()
            .filter(|(scope, _)| scope.is_public())
            .map(|(_, docs)| docs.len())
            .sum()
    }

    fn parent_exists(collections: &HashMap<ScopePath, Collection>, scope: &ScopePath) -> bool {
        match scope.parent() {
            None => true,
            Some((parent_scope, parent_id)) => collections
                .get(&parent_scope)
                .is_some_and(|docs| docs.contains_key(&parent_id)),
        }
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, scope: &ScopePath, data: serde_json::Value) -> StoreResult<DocumentId> {
        require_object(scope, &data)?;
        let mut collections = self.collections.write().await;
        if !Self::parent_exists(&collections, scope) {
            return Err(missing_parent(scope));
        }

        let id = DocumentId::new();
        let now = now_millis();
        collections.entry(scope.clone()).or_default().insert(
            id,
            Document {
                id,
                data,
                created_at: now,
                modified_at: now,
            },
        );
        Ok(id)
    }

    async fn update(&self, scope: &ScopePath, id: DocumentId, patch: &Patch) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(scope)
            .and_then(|docs| docs.get_mut(&id))
            .ok_or_else(|| missing(scope, id))?;
        patch.apply_to(&mut doc.data);
        doc.modified_at = now_millis();
        Ok(())
    }

    async fn delete(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.get_mut(scope).ok_or_else(|| missing(scope, id))?;
        docs.remove(&id).ok_or_else(|| missing(scope, id))?;
        if docs.is_empty() {
            collections.remove(scope);
        }
        Ok(())
    }

    async fn get(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<Document> {
        self.collections
            .read()
            .await
            .get(scope)
            .and_then(|docs| docs.get(&id))
            .cloned()
            .ok_or_else(|| missing(scope, id))
    }

    async fn list(&self, scope: &ScopePath) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(scope)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}
