use curio_model::{Catalog, Document, Item, Stored};
use curio_types::{DocumentId, UserId};
use pretty_assertions::assert_eq;
use serde_json::json;

fn make_document(data: serde_json::Value) -> Document {
    Document {
        id: DocumentId::new(),
        data,
        created_at: 1000,
        modified_at: 2000,
    }
}

// ── JSON pointer helpers ─────────────────────────────────────────

#[test]
fn get_str_returns_string_field() {
    let d = make_document(json!({"name": "Stamps", "count": 5}));
    assert_eq!(d.get_str("/name"), Some("Stamps"));
    assert_eq!(d.get_str("/count"), None);
    assert_eq!(d.get_str("/missing"), None);
}

#[test]
fn get_bool_returns_boolean_field() {
    let d = make_document(json!({"isPublic": true, "name": "x"}));
    assert_eq!(d.get_bool("/isPublic"), Some(true));
    assert_eq!(d.get_bool("/name"), None);
}

#[test]
fn field_reads_top_level_value() {
    let d = make_document(json!({"images": ["a.png"]}));
    assert_eq!(d.field("images"), Some(&json!(["a.png"])));
    assert_eq!(d.field("nope"), None);
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn decode_catalog_with_link() {
    let owner = UserId::new();
    let link = DocumentId::new();
    let d = make_document(json!({
        "ownerId": owner,
        "name": "Coins",
        "category": "Numismatics",
        "description": "Old coins",
        "images": ["front.jpg", "back.jpg"],
        "publicId": link,
        "isPublic": true,
    }));

    let catalog: Catalog = d.decode().unwrap();
    assert_eq!(catalog.owner_id, owner);
    assert_eq!(catalog.public_id, Some(link));
    assert!(catalog.is_public);
    assert_eq!(catalog.images, vec!["front.jpg", "back.jpg"]);
}

#[test]
fn decode_fills_defaults_for_missing_fields() {
    let d = make_document(json!({"name": "Lamp"}));
    let item: Item = d.decode().unwrap();
    assert_eq!(item.value, "");
    assert_eq!(item.description, "");
    assert!(item.images.is_empty());
    assert_eq!(item.public_id, None);
}

#[test]
fn decode_rejects_missing_required_field() {
    let d = make_document(json!({"value": "12"}));
    assert!(d.decode::<Item>().is_err());
}

#[test]
fn into_stored_keeps_id() {
    let d = make_document(json!({"name": "Lamp", "value": "40 EUR"}));
    let id = d.id;
    let stored: Stored<Item> = d.into_stored().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.record.value, "40 EUR");
}
