//! Consistency rules shared by the writer and the cascade.
//!
//! Private-tree failures are the caller's problem and are always returned.
//! Public-tree failures never fail the user-visible operation: they are
//! classified, logged, and turned into a [`MirrorOutcome::Failed`].

use crate::error::MirrorResult;
use curio_model::Catalog;
use curio_storage::StoreError;
use curio_types::{DocumentId, Level};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a failed store call should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Network/availability problem; the same call may be re-run.
    Transient,
    /// The target does not exist. Success when deleting.
    AlreadyAbsent,
    /// A `publicId` points at a public document that no longer exists.
    OrphanedLink,
    /// The caller may not perform the operation. Never retried.
    PermissionDenied,
    /// Anything else that will not fix itself.
    Terminal,
}

/// Classifies a store error.
pub fn classify(err: &StoreError) -> ErrorClass {
    if err.is_transient() {
        return ErrorClass::Transient;
    }
    match err {
        StoreError::NotFound(_) => ErrorClass::AlreadyAbsent,
        StoreError::PermissionDenied(_) => ErrorClass::PermissionDenied,
        _ => ErrorClass::Terminal,
    }
}

/// Why a mirror write was not issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The catalog is not published.
    CatalogPrivate,
    /// An ancestor at this level has no mirror yet.
    ParentUnlinked(Level),
}

/// Result of one mirror handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorOutcome {
    /// Nothing to mirror.
    Skipped(SkipReason),
    /// A new public document was created and linked.
    Created(DocumentId),
    /// The linked public document was overwritten in place.
    Updated(DocumentId),
    /// The link pointed at a missing document; a fresh one replaced it.
    Repaired { stale: DocumentId, fresh: DocumentId },
    /// The mirror write failed and was absorbed.
    Failed(ErrorClass),
}

impl MirrorOutcome {
    /// Public id the private record is linked to after this outcome, if known.
    pub fn public_id(&self) -> Option<DocumentId> {
        match self {
            MirrorOutcome::Created(id) | MirrorOutcome::Updated(id) => Some(*id),
            MirrorOutcome::Repaired { fresh, .. } => Some(*fresh),
            MirrorOutcome::Skipped(_) | MirrorOutcome::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, MirrorOutcome::Failed(_))
    }
}

/// Tunable consistency rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsistencyPolicy {
    /// Recreate and relink a mirror when its link points at nothing.
    pub repair_orphaned_links: bool,
    /// When deleting a public node, also delete public children that no
    /// private record links to.
    pub sweep_public_orphans: bool,
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        Self {
            repair_orphaned_links: true,
            sweep_public_orphans: true,
        }
    }
}

impl ConsistencyPolicy {
    /// Whether writes to this catalog are mirrored at all.
    pub fn catalog_gate(&self, catalog: &Catalog) -> Result<(), SkipReason> {
        if catalog.is_public {
            Ok(())
        } else {
            Err(SkipReason::CatalogPrivate)
        }
    }

    /// Converts a mirror-side result into an outcome, logging failures.
    pub fn absorb(&self, action: &str, result: MirrorResult<MirrorOutcome>) -> MirrorOutcome {
        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                let class = err.class();
                warn!("Mirror {} failed ({:?}), private change kept: {}", action, class, err);
                MirrorOutcome::Failed(class)
            }
        }
    }

    /// Whether a failed delete still counts as done (the target was gone).
    pub fn counts_as_deleted(&self, err: &StoreError) -> bool {
        classify(err) == ErrorClass::AlreadyAbsent
    }
}
