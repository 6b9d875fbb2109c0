use crate::Document;
use curio_types::{DocumentId, Level, UserId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Reference to a stored image (URL or storage path). Opaque to the core.
pub type ImageRef = String;

/// A typed record stored at a fixed level of one tree.
pub trait Record: Serialize + DeserializeOwned {
    /// Level of the collection holding this record.
    const LEVEL: Level;
    /// Whether the record lives in the public mirror tree.
    const PUBLIC: bool;

    /// Encodes the record as document data.
    fn to_data(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Decodes the record from a stored document.
    fn from_document(doc: &Document) -> serde_json::Result<Self> {
        doc.decode()
    }
}

// ── Private records ──────────────────────────────────────────────

/// A user's collection of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub owner_id: UserId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<DocumentId>,
    #[serde(default)]
    pub is_public: bool,
}

impl Catalog {
    /// Denormalized projection shown in the public index.
    pub fn to_public(&self) -> PublicCatalog {
        PublicCatalog {
            owner_id: self.owner_id,
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            images: self.images.clone(),
        }
    }
}

impl Record for Catalog {
    const LEVEL: Level = Level::Catalog;
    const PUBLIC: bool = false;
}

/// A possession recorded under a catalog.
///
/// `value` and `description` are plain fields; they are not modelled as
/// attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<DocumentId>,
}

impl Item {
    pub fn to_public(&self, owner_id: UserId) -> PublicItem {
        PublicItem {
            owner_id,
            name: self.name.clone(),
            value: self.value.clone(),
            description: self.description.clone(),
            images: self.images.clone(),
        }
    }
}

impl Record for Item {
    const LEVEL: Level = Level::Item;
    const PUBLIC: bool = false;
}

/// A free-form name/value pair attached to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<DocumentId>,
}

impl Attribute {
    pub fn to_public(&self, owner_id: UserId) -> PublicAttribute {
        PublicAttribute {
            owner_id,
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }
}

impl Record for Attribute {
    const LEVEL: Level = Level::Attribute;
    const PUBLIC: bool = false;
}

// ── Public mirrors ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCatalog {
    pub owner_id: UserId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl Record for PublicCatalog {
    const LEVEL: Level = Level::Catalog;
    const PUBLIC: bool = true;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicItem {
    pub owner_id: UserId,
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl Record for PublicItem {
    const LEVEL: Level = Level::Item;
    const PUBLIC: bool = true;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAttribute {
    pub owner_id: UserId,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Record for PublicAttribute {
    const LEVEL: Level = Level::Attribute;
    const PUBLIC: bool = true;
}

// ── Creation input ───────────────────────────────────────────────

/// Fields supplied when creating a catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalog {
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    #[serde(default)]
    pub is_public: bool,
}

impl NewCatalog {
    pub fn into_record(self, owner_id: UserId) -> Catalog {
        Catalog {
            owner_id,
            name: self.name,
            category: self.category,
            description: self.description,
            images: self.images,
            public_id: None,
            is_public: self.is_public,
        }
    }
}

/// Fields supplied when creating an item. Images are passed separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub value: String,
    pub description: String,
}

impl NewItem {
    pub fn into_record(self, images: Vec<ImageRef>) -> Item {
        Item {
            name: self.name,
            value: self.value,
            description: self.description,
            images,
            public_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttribute {
    pub name: String,
    pub value: String,
}

impl NewAttribute {
    pub fn into_record(self) -> Attribute {
        Attribute {
            name: self.name,
            value: self.value,
            public_id: None,
        }
    }
}
