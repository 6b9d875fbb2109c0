mod common;

use common::{new_attribute, new_catalog, new_item, setup, FaultKind, Op, Side};
use curio_mirror::{Curator, ErrorClass, MirrorConfig, MirrorOutcome};
use curio_storage::StoreConfig;
use curio_types::{DocumentId, UserId};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn private_create_failure_is_returned() {
    let f = setup();
    f.store.fail(Op::Create, Side::Private, FaultKind::Unavailable);

    let err = f
        .curator
        .create_catalog(f.owner, new_catalog("Shells", true))
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Transient);
    assert_eq!(f.store.public_calls(Op::Create), 0);
}

#[tokio::test]
async fn public_create_failure_is_swallowed() {
    let f = setup();
    f.store.fail(Op::Create, Side::Public, FaultKind::Unavailable);

    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Shells", true))
        .await
        .unwrap();

    let stored = f.curator.fetch_catalog(f.owner, catalog).await.unwrap();
    assert_eq!(stored.name, "Shells");
    assert_eq!(stored.public_id, None);
}

#[tokio::test]
async fn public_update_failure_is_reported_as_outcome() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Shells", true))
        .await
        .unwrap();
    f.store.fail(Op::Update, Side::Public, FaultKind::Unavailable);

    let outcome = f
        .curator
        .update_catalog_details(f.owner, catalog, None, "Nature", "Beach finds")
        .await
        .unwrap();

    assert_eq!(outcome, MirrorOutcome::Failed(ErrorClass::Transient));
    let stored = f.curator.fetch_catalog(f.owner, catalog).await.unwrap();
    assert_eq!(stored.category, "Nature");
    assert_eq!(stored.description, "Beach finds");
}

#[tokio::test]
async fn public_permission_denied_is_absorbed() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Shells", true))
        .await
        .unwrap();
    f.store.fail(Op::Create, Side::Public, FaultKind::PermissionDenied);

    let item = f
        .curator
        .create_item(f.owner, catalog, new_item("Cowrie"), vec![])
        .await
        .unwrap();
    let outcome = f
        .curator
        .update_item_description(f.owner, catalog, item, None, "Glossy")
        .await
        .unwrap();
    assert_eq!(outcome, MirrorOutcome::Failed(ErrorClass::PermissionDenied));
}

#[tokio::test]
async fn private_update_of_missing_record_fails() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Shells", true))
        .await
        .unwrap();

    let err = f
        .curator
        .update_item_name(f.owner, catalog, DocumentId::new(), None, "Ghost")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn item_updates_flow_into_mirror() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Shells", true))
        .await
        .unwrap();
    let item = f
        .curator
        .create_item(f.owner, catalog, new_item("Conch"), vec![])
        .await
        .unwrap();
    let link = f.curator.fetch_item(f.owner, catalog, item).await.unwrap().public_id;

    f.curator
        .update_item_value(f.owner, catalog, item, link, "45")
        .await
        .unwrap();
    f.curator
        .update_item_description(f.owner, catalog, item, link, "Pink lip")
        .await
        .unwrap();
    f.curator
        .update_item_images(f.owner, catalog, item, link, vec!["a.png".into(), "b.png".into()])
        .await
        .unwrap();

    let catalog_link = f.curator.fetch_catalog(f.owner, catalog).await.unwrap().public_id.unwrap();
    let public = f.curator.fetch_public_items(catalog_link).await.unwrap();
    assert_eq!(public[0].record.value, "45");
    assert_eq!(public[0].record.description, "Pink lip");
    assert_eq!(public[0].record.images, vec!["a.png".to_string(), "b.png".to_string()]);
}

#[tokio::test]
async fn attribute_updates_flow_into_mirror() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Shells", true))
        .await
        .unwrap();
    let item = f
        .curator
        .create_item(f.owner, catalog, new_item("Conch"), vec![])
        .await
        .unwrap();
    let attribute = f
        .curator
        .create_attribute(f.owner, catalog, item, new_attribute("Origin", "Bahamas"))
        .await
        .unwrap();

    f.curator
        .update_attribute_name(f.owner, catalog, item, attribute, None, "Found in")
        .await
        .unwrap();
    let outcome = f
        .curator
        .update_attribute_value(f.owner, catalog, item, attribute, None, "Florida")
        .await
        .unwrap();
    assert!(matches!(outcome, MirrorOutcome::Updated(_)));

    let catalog_link = f.curator.fetch_catalog(f.owner, catalog).await.unwrap().public_id.unwrap();
    let item_link = f.curator.fetch_item(f.owner, catalog, item).await.unwrap().public_id.unwrap();
    let public = f.curator.fetch_public_attributes(catalog_link, item_link).await.unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].record.name, "Found in");
    assert_eq!(public[0].record.value, "Florida");
    assert_eq!(public[0].record.owner_id, f.owner);
}

#[tokio::test]
async fn owners_cannot_see_each_others_private_trees() {
    let f = setup();
    f.curator
        .create_catalog(f.owner, new_catalog("Shells", false))
        .await
        .unwrap();

    assert!(f.curator.fetch_catalogs(UserId::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn curator_from_sqlite_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = MirrorConfig {
        store: StoreConfig::Sqlite {
            path: dir.path().join("curio.db"),
        },
        ..MirrorConfig::default()
    };
    let curator = Curator::from_config(&config).unwrap();
    assert_eq!(curator.store().backend_name(), "sqlite");

    let owner = UserId::new();
    let catalog = curator
        .create_catalog(owner, new_catalog("Fossils", true))
        .await
        .unwrap();
    curator
        .create_item(owner, catalog, new_item("Ammonite"), vec![])
        .await
        .unwrap();
    assert_eq!(curator.fetch_public_catalogs().await.unwrap().len(), 1);

    curator.delete_catalog(owner, catalog).await.unwrap();
    assert!(curator.fetch_public_catalogs().await.unwrap().is_empty());
    assert!(curator.fetch_catalogs(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn curator_carries_configured_policy() {
    let config = MirrorConfig::from_json(r#"{"sweep_public_orphans": false}"#).unwrap();
    let curator = Curator::from_config(&config).unwrap();

    assert!(!curator.policy().sweep_public_orphans);
    assert!(curator.policy().repair_orphaned_links);
    assert_eq!(curator.store().backend_name(), "memory");
}
