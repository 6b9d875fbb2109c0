use curio_types::{DocumentId, Error, UserId};
use proptest::prelude::*;
use std::collections::HashSet;
use std::str::FromStr;

// ── DocumentId ────────────────────────────────────────────────────

#[test]
fn document_id_new_is_unique() {
    let a = DocumentId::new();
    let b = DocumentId::new();
    assert_ne!(a, b);
}

#[test]
fn document_id_renders_as_hyphenated_v7() {
    let text = DocumentId::new().to_string();
    let uuid = uuid::Uuid::parse_str(&text).unwrap();
    assert_eq!(text.len(), 36);
    assert_eq!(uuid.get_version_num(), 7);
}

#[test]
fn document_id_display_and_parse() {
    let id = DocumentId::new();
    let parsed = DocumentId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn document_id_parse_invalid() {
    assert!(matches!(DocumentId::parse("not-a-uuid"), Err(Error::InvalidUuid(_))));
    assert!(DocumentId::from_str("garbage").is_err());
}

#[test]
fn document_ids_never_repeat() {
    let ids: HashSet<DocumentId> = (0..1000).map(|_| DocumentId::new()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn document_id_serializes_as_bare_string() {
    let id = DocumentId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
    let back: DocumentId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

// ── UserId ────────────────────────────────────────────────────────

#[test]
fn user_id_display_and_parse() {
    let id = UserId::new();
    assert_eq!(UserId::parse(&id.to_string()).unwrap(), id);
}

#[test]
fn user_id_rejects_empty_string() {
    assert!(UserId::parse("").is_err());
}

#[test]
fn user_id_default_is_unique() {
    assert_ne!(UserId::default(), UserId::default());
}

proptest! {
    #[test]
    fn arbitrary_uuid_survives_string_form(bytes in any::<[u8; 16]>()) {
        let text = uuid::Uuid::from_bytes(bytes).to_string();
        let id = DocumentId::from_str(&text).unwrap();
        prop_assert_eq!(id.to_string(), text);
    }
}
