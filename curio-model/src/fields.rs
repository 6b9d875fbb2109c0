//! Stored field names shared by records and patches.

pub const NAME: &str = "name";
pub const CATEGORY: &str = "category";
pub const DESCRIPTION: &str = "description";
pub const VALUE: &str = "value";
pub const IMAGES: &str = "images";
pub const IS_PUBLIC: &str = "isPublic";

/// Forward link from a private record to its public mirror.
pub const PUBLIC_ID: &str = "publicId";
