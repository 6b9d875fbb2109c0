use curio_types::DocumentId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A document as held by the store.
///
/// The `data` field holds the record's JSON object. Timestamps are unix
/// milliseconds assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub data: serde_json::Value,
    pub created_at: i64,
    pub modified_at: i64,
}

impl Document {
    /// Extract a string value from `data` using a JSON pointer (e.g., "/name").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.data.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value from `data` using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.data.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Top-level field lookup.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.data.get(name)
    }

    /// Decodes `data` into a typed record.
    pub fn decode<R: DeserializeOwned>(&self) -> serde_json::Result<R> {
        R::deserialize(&self.data)
    }

    /// Decodes into a [`Stored`] record keeping the document id.
    pub fn into_stored<R: DeserializeOwned>(self) -> serde_json::Result<Stored<R>> {
        let record = self.decode()?;
        Ok(Stored {
            id: self.id,
            record,
        })
    }
}

/// A decoded record together with its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<R> {
    pub id: DocumentId,
    pub record: R,
}
