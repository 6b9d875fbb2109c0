//! Mirroring engine keeping a user's private catalog tree and the public
//! index consistent.
//!
//! # Architecture
//!
//! Every catalog, item and attribute lives in the owner's private tree. When
//! a catalog is published its content is projected into the public tree
//! under independent ids; each private record remembers its mirror through
//! a `publicId` link.
//!
//! ## Components
//!
//! - **Linker**: reads, attaches and clears `publicId` links
//! - **Policy**: gating rules and error classification
//! - **Writer**: projects private writes into the public tree
//! - **Cascade**: deletes subtrees, private first, public best-effort
//! - **Publisher**: explicit publish, unpublish and republish sweeps
//! - **Curator**: the facade callers use; it surfaces private failures and
//!   absorbs mirror failures
//!
//! ## Write path
//!
//! 1. Write the private document (failure is returned to the caller)
//! 2. Re-read it and resolve the parent's public scope through the links
//! 3. Create or overwrite the mirror, attaching the link on first creation
//! 4. Log and swallow any mirror-side failure
//!
//! # Example
//!
//! ```
//! use curio_mirror::{Curator, MirrorConfig};
//!
//! let config = MirrorConfig::from_json(r#"{"store": {"backend": "memory"}}"#).unwrap();
//! let curator = Curator::from_config(&config).unwrap();
//! assert_eq!(curator.store().backend_name(), "memory");
//! ```

mod cascade;
mod config;
mod curator;
mod error;
mod linker;
mod policy;
mod publisher;
mod writer;

pub use cascade::{CascadeDeleter, CascadeReport, PublicFailure};
pub use config::MirrorConfig;
pub use curator::Curator;
pub use error::{MirrorError, MirrorResult};
pub use linker::{IdentifierLinker, PublicScope};
pub use policy::{classify, ConsistencyPolicy, ErrorClass, MirrorOutcome, SkipReason};
pub use publisher::{Publisher, RepublishReport};
pub use writer::MirrorWriter;
