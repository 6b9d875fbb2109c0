//! Record model for Curio.
//!
//! Defines the types every other crate exchanges:
//! - [`Document`]: the stored container (id, JSON payload, timestamps)
//! - [`Catalog`], [`Item`], [`Attribute`]: private records, each carrying an
//!   optional `publicId` link to its mirror
//! - [`PublicCatalog`], [`PublicItem`], [`PublicAttribute`]: the denormalized
//!   mirror records shown in the public index
//! - [`Patch`]: a top-level field merge applied by `update`
//!
//! Records serialize with camelCase keys (`publicId`, `isPublic`, `ownerId`)
//! so documents written by older clients stay readable.

mod document;
pub mod fields;
mod patch;
mod record;

pub use document::{Document, Stored};
pub use patch::Patch;
pub use record::{
    Attribute, Catalog, ImageRef, Item, NewAttribute, NewCatalog, NewItem, PublicAttribute,
    PublicCatalog, PublicItem, Record,
};
