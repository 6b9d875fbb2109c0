//! The storage contract shared by all backends.

use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use curio_model::{Document, Patch, Record, Stored};
use curio_types::{DocumentId, ScopePath};

/// Single-document CRUD over the three-level catalog hierarchy.
///
/// Implementations give no atomicity across documents. `get`, `update` and
/// `delete` report an absent target as [`StoreError::NotFound`]; callers
/// decide whether that matters.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Short backend name for diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Stores `data` (a JSON object) as a new document and returns its
    /// store-assigned id. Fails with `NotFound` if the parent document named
    /// by `scope` does not exist.
    async fn create(&self, scope: &ScopePath, data: serde_json::Value) -> StoreResult<DocumentId>;

    /// Merges `patch` into an existing document.
    async fn update(&self, scope: &ScopePath, id: DocumentId, patch: &Patch) -> StoreResult<()>;

    /// Removes one document. Child documents are left untouched.
    async fn delete(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<()>;

    /// Reads one document.
    async fn get(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<Document>;

    /// Lists all documents of a collection, ordered by id.
    async fn list(&self, scope: &ScopePath) -> StoreResult<Vec<Document>>;
}

/// Typed helpers over [`EntityStore`] for [`Record`] types.
///
/// Every helper checks that the record belongs to the scope's tree and level
/// before touching the store.
#[async_trait]
pub trait RecordStoreExt: EntityStore {
    async fn create_record<R: Record + Sync>(
        &self,
        scope: &ScopePath,
        record: &R,
    ) -> StoreResult<DocumentId> {
        check_scope::<R>(scope)?;
        let data = record.to_data()?;
        self.create(scope, data).await
    }

    async fn get_record<R: Record + Send>(&self, scope: &ScopePath, id: DocumentId) -> StoreResult<R> {
        check_scope::<R>(scope)?;
        let doc = self.get(scope, id).await?;
        Ok(R::from_document(&doc)?)
    }

    async fn list_records<R: Record + Send>(&self, scope: &ScopePath) -> StoreResult<Vec<Stored<R>>> {
        check_scope::<R>(scope)?;
        let docs = self.list(scope).await?;
        docs.into_iter()
            .map(|doc| doc.into_stored().map_err(StoreError::from))
            .collect()
    }
}

impl<S: EntityStore + ?Sized> RecordStoreExt for S {}

fn check_scope<R: Record>(scope: &ScopePath) -> StoreResult<()> {
    if scope.level() != R::LEVEL || scope.is_public() != R::PUBLIC {
        let tree = if R::PUBLIC { "public" } else { "private" };
        return Err(StoreError::InvalidScope(format!(
            "{tree} {} record does not belong in {scope}",
            R::LEVEL
        )));
    }
    Ok(())
}

/// Validates that creation data is a JSON object.
pub(crate) fn require_object(scope: &ScopePath, data: &serde_json::Value) -> StoreResult<()> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidData(format!(
            "document data for {scope} must be a JSON object"
        )))
    }
}

/// Message used for `NotFound` on a specific document.
pub(crate) fn missing(scope: &ScopePath, id: DocumentId) -> StoreError {
    StoreError::NotFound(format!("{scope}/{id}"))
}

/// Message used for `NotFound` when a parent document is absent at create.
pub(crate) fn missing_parent(scope: &ScopePath) -> StoreError {
    match scope.parent() {
        Some((parent_scope, parent_id)) => {
            StoreError::NotFound(format!("parent {parent_scope}/{parent_id} of {scope}"))
        }
        None => StoreError::NotFound(scope.to_string()),
    }
}
