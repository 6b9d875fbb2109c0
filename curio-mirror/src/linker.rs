//! `publicId` bookkeeping.
//!
//! The private record is the only side that knows about the link; public
//! documents carry no reference back. The linker never decides whether a
//! mirror should exist, it only reads and writes the link field.

use crate::error::MirrorResult;
use curio_model::{fields, Document, Patch};
use curio_storage::EntityStore;
use curio_types::{DocumentId, Level, ScopePath, Tree};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the mirror of a collection lives, as far as the links tell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicScope {
    /// Every ancestor is linked; mirrors of this collection go here.
    Linked(ScopePath),
    /// The ancestor at this level has no link.
    Unlinked(Level),
}

impl PublicScope {
    pub fn linked(self) -> Option<ScopePath> {
        match self {
            PublicScope::Linked(scope) => Some(scope),
            PublicScope::Unlinked(_) => None,
        }
    }
}

/// Reads and writes links between private records and their mirrors.
#[derive(Clone)]
pub struct IdentifierLinker {
    store: Arc<dyn EntityStore>,
}

impl IdentifierLinker {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// The mirror id stored on a private document, if any.
    ///
    /// A value that does not parse as an id is treated as no link.
    pub fn link_of(doc: &Document) -> Option<DocumentId> {
        let raw = doc.field(fields::PUBLIC_ID)?;
        if raw.is_null() {
            return None;
        }
        match raw.as_str().map(DocumentId::parse) {
            Some(Ok(id)) => Some(id),
            _ => {
                warn!("Ignoring malformed {} on document {}: {}", fields::PUBLIC_ID, doc.id, raw);
                None
            }
        }
    }

    /// Writes `public_id` onto the private record.
    pub async fn attach_link(
        &self,
        scope: &ScopePath,
        id: DocumentId,
        public_id: DocumentId,
    ) -> MirrorResult<()> {
        let patch = Patch::new().set_serialized(fields::PUBLIC_ID, &public_id)?;
        self.store.update(scope, id, &patch).await?;
        debug!("Linked {}/{} -> {}", scope, id, public_id);
        Ok(())
    }

    /// Removes the link from the private record.
    pub async fn clear_link(&self, scope: &ScopePath, id: DocumentId) -> MirrorResult<()> {
        self.store
            .update(scope, id, &Patch::new().clear(fields::PUBLIC_ID))
            .await?;
        debug!("Unlinked {}/{}", scope, id);
        Ok(())
    }

    /// Reads the private record and returns its link.
    pub async fn resolve(&self, scope: &ScopePath, id: DocumentId) -> MirrorResult<Option<DocumentId>> {
        let doc = self.store.get(scope, id).await?;
        Ok(Self::link_of(&doc))
    }

    /// Follows the links of every ancestor of a private collection to find
    /// the matching public collection.
    ///
    /// Fails with `NotFound` if a private ancestor does not exist.
    pub async fn resolve_public_scope(&self, private_scope: &ScopePath) -> MirrorResult<PublicScope> {
        let mut private = ScopePath::catalogs(private_scope.tree());
        let mut public = ScopePath::catalogs(Tree::Public);

        for &ancestor in private_scope.ancestors() {
            let level = private.level();
            let Some(link) = self.resolve(&private, ancestor).await? else {
                return Ok(PublicScope::Unlinked(level));
            };
            private = private.child(ancestor)?;
            public = public.child(link)?;
        }
        Ok(PublicScope::Linked(public))
    }

    /// True if the record is linked and the linked public document exists.
    pub async fn has_live_mirror(&self, private_scope: &ScopePath, id: DocumentId) -> MirrorResult<bool> {
        let Some(link) = self.resolve(private_scope, id).await? else {
            return Ok(false);
        };
        let Some(public_scope) = self.resolve_public_scope(private_scope).await?.linked() else {
            return Ok(false);
        };
        match self.store.get(&public_scope, link).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
