//! Mirror writer - projects private writes into the public tree.
//!
//! Each handler runs after the private write it mirrors has succeeded. It
//! re-reads the private record, so repeated calls observe the link attached
//! by an earlier call and never create a second mirror.

use crate::error::{MirrorError, MirrorResult};
use crate::linker::{IdentifierLinker, PublicScope};
use crate::policy::{ConsistencyPolicy, MirrorOutcome, SkipReason};
use curio_model::{Attribute, Catalog, Item, Patch, Record};
use curio_storage::{EntityStore, RecordStoreExt};
use curio_types::{DocumentId, ScopePath, Tree, UserId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Issues public-tree writes for private catalog, item and attribute writes.
#[derive(Clone)]
pub struct MirrorWriter {
    store: Arc<dyn EntityStore>,
    linker: IdentifierLinker,
    policy: ConsistencyPolicy,
}

impl MirrorWriter {
    pub fn new(store: Arc<dyn EntityStore>, policy: ConsistencyPolicy) -> Self {
        Self {
            linker: IdentifierLinker::new(store.clone()),
            store,
            policy,
        }
    }

    pub fn linker(&self) -> &IdentifierLinker {
        &self.linker
    }

    /// Mirrors a created or updated catalog.
    ///
    /// Unpublished catalogs are skipped. Children are not touched: they get
    /// mirrored on their own next write (or by an explicit republish).
    pub async fn on_catalog_written(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        expected_link: Option<DocumentId>,
    ) -> MirrorResult<MirrorOutcome> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        let catalog: Catalog = self.store.get_record(&scope, catalog_id).await?;
        if let Err(reason) = self.policy.catalog_gate(&catalog) {
            debug!("Not mirroring catalog {}: {:?}", catalog_id, reason);
            return Ok(MirrorOutcome::Skipped(reason));
        }

        let link = check_expected(&scope, catalog_id, expected_link, catalog.public_id);
        self.write_mirror(
            &scope,
            catalog_id,
            link,
            &ScopePath::catalogs(Tree::Public),
            &catalog.to_public(),
        )
        .await
    }

    /// Mirrors a created or updated item, provided its catalog is linked.
    pub async fn on_item_written(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        expected_link: Option<DocumentId>,
    ) -> MirrorResult<MirrorOutcome> {
        let scope = ScopePath::items(Tree::Private(owner), catalog_id);
        if let Some(reason) = self.gate(owner, catalog_id).await? {
            debug!("Not mirroring item {}: {:?}", item_id, reason);
            return Ok(MirrorOutcome::Skipped(reason));
        }
        match self.mirror_item(owner, &scope, item_id, expected_link).await {
            Err(MirrorError::MissingParentMirror(missing)) if self.policy.repair_orphaned_links => {
                info!("Catalog mirror {} is gone, repairing before item {}", missing, item_id);
                self.on_catalog_written(owner, catalog_id, None).await?;
                self.mirror_item(owner, &scope, item_id, None).await
            }
            result => result,
        }
    }

    /// Mirrors a created or updated attribute, provided its item is linked.
    pub async fn on_attribute_written(
        &self,
        owner: UserId,
        catalog_id: DocumentId,
        item_id: DocumentId,
        attribute_id: DocumentId,
        expected_link: Option<DocumentId>,
    ) -> MirrorResult<MirrorOutcome> {
        let scope = ScopePath::attributes(Tree::Private(owner), catalog_id, item_id);
        if let Some(reason) = self.gate(owner, catalog_id).await? {
            debug!("Not mirroring attribute {}: {:?}", attribute_id, reason);
            return Ok(MirrorOutcome::Skipped(reason));
        }
        match self
            .mirror_attribute(owner, &scope, attribute_id, expected_link)
            .await
        {
            Err(MirrorError::MissingParentMirror(missing)) if self.policy.repair_orphaned_links => {
                info!(
                    "Item mirror {} is gone, repairing before attribute {}",
                    missing, attribute_id
                );
                self.on_item_written(owner, catalog_id, item_id, None).await?;
                self.mirror_attribute(owner, &scope, attribute_id, None).await
            }
            result => result,
        }
    }

    /// Children are mirrored only while their catalog is flagged public,
    /// whatever links remain.
    async fn gate(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<Option<SkipReason>> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        let catalog: Catalog = self.store.get_record(&scope, catalog_id).await?;
        Ok(self.policy.catalog_gate(&catalog).err())
    }

    async fn mirror_item(
        &self,
        owner: UserId,
        scope: &ScopePath,
        item_id: DocumentId,
        expected_link: Option<DocumentId>,
    ) -> MirrorResult<MirrorOutcome> {
        let public_scope = match self.linker.resolve_public_scope(scope).await? {
            PublicScope::Linked(public_scope) => public_scope,
            PublicScope::Unlinked(level) => {
                debug!("Not mirroring item {}: {} unlinked", item_id, level);
                return Ok(MirrorOutcome::Skipped(SkipReason::ParentUnlinked(level)));
            }
        };
        let item: Item = self.store.get_record(scope, item_id).await?;
        let link = check_expected(scope, item_id, expected_link, item.public_id);
        self.write_mirror(scope, item_id, link, &public_scope, &item.to_public(owner))
            .await
    }

    async fn mirror_attribute(
        &self,
        owner: UserId,
        scope: &ScopePath,
        attribute_id: DocumentId,
        expected_link: Option<DocumentId>,
    ) -> MirrorResult<MirrorOutcome> {
        let public_scope = match self.linker.resolve_public_scope(scope).await? {
            PublicScope::Linked(public_scope) => public_scope,
            PublicScope::Unlinked(level) => {
                debug!("Not mirroring attribute {}: {} unlinked", attribute_id, level);
                return Ok(MirrorOutcome::Skipped(SkipReason::ParentUnlinked(level)));
            }
        };
        let attribute: Attribute = self.store.get_record(scope, attribute_id).await?;
        let link = check_expected(scope, attribute_id, expected_link, attribute.public_id);
        self.write_mirror(
            scope,
            attribute_id,
            link,
            &public_scope,
            &attribute.to_public(owner),
        )
        .await
    }

    /// Creates the mirror if unlinked, otherwise overwrites it in place.
    async fn write_mirror<P: Record + Sync>(
        &self,
        private_scope: &ScopePath,
        private_id: DocumentId,
        link: Option<DocumentId>,
        public_scope: &ScopePath,
        projection: &P,
    ) -> MirrorResult<MirrorOutcome> {
        let Some(public_id) = link else {
            let fresh = self
                .create_linked(private_scope, private_id, public_scope, projection)
                .await?;
            return Ok(MirrorOutcome::Created(fresh));
        };

        let patch = Patch::from_record(projection)?;
        match self.store.update(public_scope, public_id, &patch).await {
            Ok(()) => {
                debug!("Updated mirror {}/{}", public_scope, public_id);
                Ok(MirrorOutcome::Updated(public_id))
            }
            Err(err) if err.is_not_found() && self.policy.repair_orphaned_links => {
                warn!(
                    "Orphaned link {}/{} -> {}, recreating mirror",
                    private_scope, private_id, public_id
                );
                let fresh = self
                    .create_linked(private_scope, private_id, public_scope, projection)
                    .await?;
                Ok(MirrorOutcome::Repaired {
                    stale: public_id,
                    fresh,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn create_linked<P: Record + Sync>(
        &self,
        private_scope: &ScopePath,
        private_id: DocumentId,
        public_scope: &ScopePath,
        projection: &P,
    ) -> MirrorResult<DocumentId> {
        let public_id = match self.store.create_record(public_scope, projection).await {
            Ok(id) => id,
            Err(err) if err.is_not_found() => {
                return Err(MirrorError::MissingParentMirror(public_scope.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        if let Err(err) = self
            .linker
            .attach_link(private_scope, private_id, public_id)
            .await
        {
            // An unlinked mirror would be duplicated by the next retry.
            if let Err(cleanup) = self.store.delete(public_scope, public_id).await {
                warn!(
                    "Could not remove unlinked mirror {}/{}: {}",
                    public_scope, public_id, cleanup
                );
            }
            return Err(err);
        }

        debug!(
            "Created mirror {}/{} for {}/{}",
            public_scope, public_id, private_scope, private_id
        );
        Ok(public_id)
    }
}

/// The stored link is authoritative; a caller-supplied link that disagrees
/// with it is stale.
fn check_expected(
    scope: &ScopePath,
    id: DocumentId,
    expected: Option<DocumentId>,
    stored: Option<DocumentId>,
) -> Option<DocumentId> {
    if let Some(expected) = expected {
        if stored != Some(expected) {
            debug!(
                "Caller link {} for {}/{} is stale, stored link is {:?}",
                expected, scope, id, stored
            );
        }
    }
    stored
}
