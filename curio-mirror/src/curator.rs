//! Curator - the entry point for catalog, item and attribute operations.
//!
//! Every write goes to the private tree first and its error, if any, is
//! returned. The mirror step that follows never fails the call; its outcome
//! is returned for updates and logged for creates.

use crate::cascade::{CascadeDeleter, CascadeReport};
use crate::config::MirrorConfig;
use crate::error::MirrorResult;
use crate::policy::{ConsistencyPolicy, MirrorOutcome};
use crate::publisher::{Publisher, RepublishReport};
use crate::writer::MirrorWriter;
use curio_model::{
    fields, Attribute, Catalog, ImageRef, Item, NewAttribute, NewCatalog, NewItem, Patch,
    PublicAttribute, PublicCatalog, PublicItem, Stored,
};
use curio_storage::{EntityStore, RecordStoreExt};
use curio_types::{DocumentId, ScopePath, Tree, UserId};
use std::sync::Arc;
use tracing::debug;

/// Facade over the store, the mirror writer, the cascade and the publisher.
#[derive(Clone)]
pub struct Curator {
    store: Arc<dyn EntityStore>,
    writer: MirrorWriter,
    cascade: CascadeDeleter,
    publisher: Publisher,
    policy: ConsistencyPolicy,
}

impl Curator {
    /// Creates a curator with the default consistency policy.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self::with_policy(store, ConsistencyPolicy::default())
    }

    /// Creates a curator with a custom consistency policy.
    pub fn with_policy(store: Arc<dyn EntityStore>, policy: ConsistencyPolicy) -> Self {
        Self {
            writer: MirrorWriter::new(store.clone(), policy),
            cascade: CascadeDeleter::new(store.clone(), policy),
            publisher: Publisher::new(store.clone(), policy),
            store,
            policy,
        }
    }

    /// Opens the configured store and builds a curator over it.
    pub fn from_config(config: &MirrorConfig) -> MirrorResult<Self> {
        let store = config.store.open()?;
        Ok(Self::with_policy(store, config.policy()))
    }

    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    pub fn policy(&self) -> ConsistencyPolicy {
        self.policy
    }

    pub fn writer(&self) -> &MirrorWriter {
        &self.writer
    }

    // ── Create ───────────────────────────────────────────────────

    /// Creates a catalog; mirrors it right away if it is created public.
    pub async fn create_catalog(&self, owner: UserId, catalog: NewCatalog) -> MirrorResult<DocumentId> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        let id = self
            .store
            .create_record(&scope, &catalog.into_record(owner))
            .await?;
        debug!("Created catalog {} for {}", id, owner);

        let result = self.writer.on_catalog_written(owner, id, None).await;
        self.policy.absorb("create catalog", result);
        Ok(id)
    }

    /// Creates an item; mirrors it if the catalog is published.
    pub async fn create_item(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item: NewItem,
        images: Vec<ImageRef>,
    ) -> MirrorResult<DocumentId> {
        let scope = ScopePath::items(Tree::Private(owner), catalog_id);
        let id = self.store.create_record(&scope, &item.into_record(images)).await?;
        debug!("Created item {} in catalog {}", id, catalog_id);

        let result = self.writer.on_item_written(owner, catalog_id, id, None).await;
        self.policy.absorb("create item", result);
        Ok(id)
    }

    /// Creates an attribute; mirrors it if its item is mirrored.
    pub async fn create_attribute(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        attribute: NewAttribute,
    ) -> MirrorResult<DocumentId> {
        let scope = ScopePath::attributes(Tree::Private(owner), catalog_id, item_id);
        let id = self.store.create_record(&scope, &attribute.into_record()).await?;
        debug!("Created attribute {} on item {}", id, item_id);

        let result = self
            .writer
            .on_attribute_written(owner, catalog_id, item_id, id, None)
            .await;
        self.policy.absorb("create attribute", result);
        Ok(id)
    }

    // ── Update ───────────────────────────────────────────────────

    pub async fn update_catalog_name(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        public_id: Option<DocumentId>,
        name: &str,
    ) -> MirrorResult<MirrorOutcome> {
        self.update_catalog(owner, catalog_id, public_id, Patch::field(fields::NAME, name))
            .await
    }

    pub async fn update_catalog_images(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        public_id: Option<DocumentId>,
        images: Vec<ImageRef>,
    ) -> MirrorResult<MirrorOutcome> {
        let patch = Patch::new().set_serialized(fields::IMAGES, &images)?;
        self.update_catalog(owner, catalog_id, public_id, patch).await
    }

    pub async fn update_catalog_details(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        public_id: Option<DocumentId>,
        category: &str,
        description: &str,
    ) -> MirrorResult<MirrorOutcome> {
        let patch = Patch::new()
            .set(fields::CATEGORY, category)
            .set(fields::DESCRIPTION, description);
        self.update_catalog(owner, catalog_id, public_id, patch).await
    }

    pub async fn update_item_name(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        public_id: Option<DocumentId>,
        name: &str,
    ) -> MirrorResult<MirrorOutcome> {
        self.update_item(owner, catalog_id, item_id, public_id, Patch::field(fields::NAME, name))
            .await
    }

    pub async fn update_item_value(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        public_id: Option<DocumentId>,
        value: &str,
    ) -> MirrorResult<MirrorOutcome> {
        self.update_item(owner, catalog_id, item_id, public_id, Patch::field(fields::VALUE, value))
            .await
    }

    pub async fn update_item_description(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        public_id: Option<DocumentId>,
        description: &str,
    ) -> MirrorResult<MirrorOutcome> {
        let patch = Patch::field(fields::DESCRIPTION, description);
        self.update_item(owner, catalog_id, item_id, public_id, patch).await
    }

    pub async fn update_item_images(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        public_id: Option<DocumentId>,
        images: Vec<ImageRef>,
    ) -> MirrorResult<MirrorOutcome> {
        let patch = Patch::new().set_serialized(fields::IMAGES, &images)?;
        self.update_item(owner, catalog_id, item_id, public_id, patch).await
    }

    pub async fn update_attribute_name(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        attribute_id: DocumentId,
        public_id: Option<DocumentId>,
        name: &str,
    ) -> MirrorResult<MirrorOutcome> {
        let patch = Patch::field(fields::NAME, name);
        self.update_attribute(owner, catalog_id, item_id, attribute_id, public_id, patch)
            .await
    }

    pub async fn update_attribute_value(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        attribute_id: DocumentId,
        public_id: Option<DocumentId>,
        value: &str,
    ) -> MirrorResult<MirrorOutcome> {
        let patch = Patch::field(fields::VALUE, value);
        self.update_attribute(owner, catalog_id, item_id, attribute_id, public_id, patch)
            .await
    }

    async fn update_catalog(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        public_id: Option<DocumentId>,
        patch: Patch,
    ) -> MirrorResult<MirrorOutcome> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        self.store.update(&scope, catalog_id, &patch).await?;

        let result = self.writer.on_catalog_written(owner, catalog_id, public_id).await;
        Ok(self.policy.absorb("update catalog", result))
    }

    async fn update_item(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        public_id: Option<DocumentId>,
        patch: Patch,
    ) -> MirrorResult<MirrorOutcome> {
        let scope = ScopePath::items(Tree::Private(owner), catalog_id);
        self.store.update(&scope, item_id, &patch).await?;

        let result = self
            .writer
            .on_item_written(owner, catalog_id, item_id, public_id)
            .await;
        Ok(self.policy.absorb("update item", result))
    }

    async fn update_attribute(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        attribute_id: DocumentId,
        public_id: Option<DocumentId>,
        patch: Patch,
    ) -> MirrorResult<MirrorOutcome> {
        let scope = ScopePath::attributes(Tree::Private(owner), catalog_id, item_id);
        self.store.update(&scope, attribute_id, &patch).await?;

        let result = self
            .writer
            .on_attribute_written(owner, catalog_id, item_id, attribute_id, public_id)
            .await;
        Ok(self.policy.absorb("update attribute", result))
    }

    // ── Publication ──────────────────────────────────────────────

    pub async fn publish_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<MirrorOutcome> {
        self.publisher.publish_catalog(owner, catalog_id).await
    }

    pub async fn unpublish_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<CascadeReport> {
        self.publisher.unpublish_catalog(owner, catalog_id).await
    }

    pub async fn republish_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<RepublishReport> {
        self.publisher.republish_catalog(owner, catalog_id).await
    }

    // ── Delete ───────────────────────────────────────────────────

    pub async fn delete_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<CascadeReport> {
        self.cascade.delete_catalog(owner, catalog_id).await
    }

    pub async fn delete_item(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
    ) -> MirrorResult<CascadeReport> {
        self.cascade.delete_item(owner, catalog_id, item_id).await
    }

    pub async fn delete_attribute(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        attribute_id: DocumentId,
    ) -> MirrorResult<CascadeReport> {
        self.cascade
            .delete_attribute(owner, catalog_id, item_id, attribute_id)
            .await
    }

    pub async fn delete_public_items(
        &self,
        public_catalog_id: DocumentId,
        public_item_ids: &[DocumentId],
    ) -> CascadeReport {
        self.cascade
            .delete_public_items(public_catalog_id, public_item_ids)
            .await
    }

    pub async fn delete_public_attributes(
        &self,
        public_catalog_id: DocumentId,
        public_item_id: DocumentId,
        public_attribute_ids: &[DocumentId],
    ) -> CascadeReport {
        self.cascade
            .delete_public_attributes(public_catalog_id, public_item_id, public_attribute_ids)
            .await
    }

    // ── Read ─────────────────────────────────────────────────────

    pub async fn fetch_catalogs(&self, owner: UserId) -> MirrorResult<Vec<Stored<Catalog>>> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        Ok(self.store.list_records(&scope).await?)
    }

    pub async fn fetch_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<Catalog> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        Ok(self.store.get_record(&scope, catalog_id).await?)
    }

    pub async fn fetch_items(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<Vec<Stored<Item>>> {
        let scope = ScopePath::items(Tree::Private(owner), catalog_id);
        Ok(self.store.list_records(&scope).await?)
    }

    pub async fn fetch_item(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
    ) -> MirrorResult<Item> {
        let scope = ScopePath::items(Tree::Private(owner), catalog_id);
        Ok(self.store.get_record(&scope, item_id).await?)
    }

    pub async fn fetch_attributes(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
    ) -> MirrorResult<Vec<Stored<Attribute>>> {
        let scope = ScopePath::attributes(Tree::Private(owner), catalog_id, item_id);
        Ok(self.store.list_records(&scope).await?)
    }

    pub async fn fetch_public_catalogs(&self) -> MirrorResult<Vec<Stored<PublicCatalog>>> {
        let scope = ScopePath::catalogs(Tree::Public);
        Ok(self.store.list_records(&scope).await?)
    }

    pub async fn fetch_public_items(&self, public_catalog_id: DocumentId) -> MirrorResult<Vec<Stored<PublicItem>>> {
        let scope = ScopePath::items(Tree::Public, public_catalog_id);
        Ok(self.store.list_records(&scope).await?)
    }

    pub async fn fetch_public_attributes(
        &self,
        public_catalog_id: DocumentId,
        public_item_id: DocumentId,
    ) -> MirrorResult<Vec<Stored<PublicAttribute>>> {
        let scope = ScopePath::attributes(Tree::Public, public_catalog_id, public_item_id);
        Ok(self.store.list_records(&scope).await?)
    }
}
