//! Publishing and unpublishing whole catalogs.
//!
//! Publishing is lazy: flipping `isPublic` mirrors the catalog record only,
//! and its items follow as they are written. [`Publisher::republish_catalog`]
//! is the explicit sweep that mirrors content created before publication.

use crate::cascade::{CascadeDeleter, CascadeReport};
use crate::error::MirrorResult;
use crate::policy::{ConsistencyPolicy, MirrorOutcome};
use crate::writer::MirrorWriter;
use curio_model::{fields, Patch};
use curio_storage::EntityStore;
use curio_types::{DocumentId, ScopePath, Tree, UserId};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Tally of a republish sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepublishReport {
    pub catalog: MirrorOutcome,
    pub created: usize,
    pub updated: usize,
    pub repaired: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RepublishReport {
    fn new(catalog: MirrorOutcome) -> Self {
        Self {
            catalog,
            created: 0,
            updated: 0,
            repaired: 0,
            skipped: 0,
            failed: 0,
        }
    }

    fn count(&mut self, outcome: MirrorOutcome) {
        match outcome {
            MirrorOutcome::Created(_) => self.created += 1,
            MirrorOutcome::Updated(_) => self.updated += 1,
            MirrorOutcome::Repaired { .. } => self.repaired += 1,
            MirrorOutcome::Skipped(_) => self.skipped += 1,
            MirrorOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Switches catalogs between private and public.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn EntityStore>,
    writer: MirrorWriter,
    cascade: CascadeDeleter,
    policy: ConsistencyPolicy,
}

impl Publisher {
    pub fn new(store: Arc<dyn EntityStore>, policy: ConsistencyPolicy) -> Self {
        Self {
            writer: MirrorWriter::new(store.clone(), policy),
            cascade: CascadeDeleter::new(store.clone(), policy),
            store,
            policy,
        }
    }

    /// Marks a catalog public and mirrors the catalog record.
    ///
    /// Existing items are not mirrored here.
    pub async fn publish_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<MirrorOutcome> {
        self.set_public_flag(owner, catalog_id, true).await?;
        let result = self.writer.on_catalog_written(owner, catalog_id, None).await;
        Ok(self.policy.absorb("publish catalog", result))
    }

    /// Marks a catalog private and removes its mirrors.
    ///
    /// The flag is cleared first so no new mirrors appear while the public
    /// subtree is being removed.
    pub async fn unpublish_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<CascadeReport> {
        self.set_public_flag(owner, catalog_id, false).await?;
        let report = self.cascade.retract_catalog(owner, catalog_id).await?;
        info!(
            "Unpublished catalog {}: {} mirrors removed, {} links cleared",
            catalog_id, report.public_deleted, report.links_cleared
        );
        Ok(report)
    }

    /// Mirrors the catalog and every item and attribute under it, top-down.
    ///
    /// Safe to re-run: already linked records are overwritten in place.
    pub async fn republish_catalog(&self, owner: UserId, catalog_id: DocumentId) -> MirrorResult<RepublishReport> {
        let catalog = self.writer.on_catalog_written(owner, catalog_id, None).await?;
        let mut report = RepublishReport::new(catalog);
        if catalog.public_id().is_none() {
            return Ok(report);
        }

        let items_scope = ScopePath::items(Tree::Private(owner), catalog_id);
        for item in self.store.list(&items_scope).await? {
            let result = self.writer.on_item_written(owner, catalog_id, item.id, None).await;
            let outcome = self.policy.absorb("republish item", result);
            report.count(outcome);
            if outcome.public_id().is_none() {
                continue;
            }

            let attributes_scope = items_scope.child(item.id)?;
            for attribute in self.store.list(&attributes_scope).await? {
                let result = self
                    .writer
                    .on_attribute_written(owner, catalog_id, item.id, attribute.id, None)
                    .await;
                report.count(self.policy.absorb("republish attribute", result));
            }
        }

        info!(
            "Republished catalog {}: {} created, {} updated, {} repaired, {} failed",
            catalog_id, report.created, report.updated, report.repaired, report.failed
        );
        Ok(report)
    }

    async fn set_public_flag(&self, owner: UserId, catalog_id: DocumentId, public: bool) -> MirrorResult<()> {
        let scope = ScopePath::catalogs(Tree::Private(owner));
        self.store
            .update(&scope, catalog_id, &Patch::field(fields::IS_PUBLIC, public))
            .await?;
        Ok(())
    }
}
