//! Engine configuration.

use crate::error::{MirrorError, MirrorResult};
use crate::policy::ConsistencyPolicy;
use curio_storage::StoreConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the mirroring engine.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Backend holding both trees.
    pub store: StoreConfig,
    /// Recreate mirrors whose link points at a deleted public document.
    pub repair_orphaned_links: bool,
    /// Delete unlinked public children together with their public parent.
    pub sweep_public_orphans: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        let policy = ConsistencyPolicy::default();
        Self {
            store: StoreConfig::default(),
            repair_orphaned_links: policy.repair_orphaned_links,
            sweep_public_orphans: policy.sweep_public_orphans,
        }
    }
}

impl MirrorConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> MirrorResult<Self> {
        serde_json::from_str(json).map_err(|e| MirrorError::Config(e.to_string()))
    }

    /// The consistency rules this configuration selects.
    pub fn policy(&self) -> ConsistencyPolicy {
        ConsistencyPolicy {
            repair_orphaned_links: self.repair_orphaned_links,
            sweep_public_orphans: self.sweep_public_orphans,
        }
    }
}
