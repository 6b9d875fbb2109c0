use serde::Serialize;
use serde_json::{Map, Value};

/// Field-level update applied on top of a stored document.
///
/// Each key overwrites the same top-level key of the document (last writer
/// wins per field). A `null` value removes the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: Map<String, Value>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch setting a single field.
    pub fn field(name: &str, value: impl Into<Value>) -> Self {
        Self::new().set(name, value)
    }

    /// Patch assigning every top-level field of a serialized record, which
    /// overwrites the record's fields wholesale.
    pub fn from_record<T: Serialize>(record: &T) -> serde_json::Result<Self> {
        match serde_json::to_value(record)? {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(serde::ser::Error::custom(
                "record must serialize to a JSON object",
            )),
        }
    }

    /// Adds a field assignment.
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Adds a serializable field assignment.
    pub fn set_serialized<T: Serialize>(self, name: &str, value: &T) -> serde_json::Result<Self> {
        let value = serde_json::to_value(value)?;
        Ok(self.set(name, value))
    }

    /// Marks a field for removal.
    pub fn clear(self, name: &str) -> Self {
        self.set(name, Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates the assignments in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Applies the patch to a document's data. Non-object data is replaced
    /// by an object holding only the patched fields.
    pub fn apply_to(&self, data: &mut Value) {
        if !data.is_object() {
            *data = Value::Object(Map::new());
        }
        if let Some(obj) = data.as_object_mut() {
            for (key, value) in &self.fields {
                if value.is_null() {
                    obj.remove(key);
                } else {
                    obj.insert(key.clone(), value.clone());
                }
            }
        }
    }
}
