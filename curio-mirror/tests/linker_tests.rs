mod common;

use common::{new_catalog, new_item, setup};
use curio_mirror::{IdentifierLinker, PublicScope};
use curio_storage::{EntityStore, MemoryStore};
use curio_types::{DocumentId, Level, ScopePath, Tree, UserId};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn linker() -> (Arc<MemoryStore>, IdentifierLinker) {
    let store = Arc::new(MemoryStore::new());
    (store.clone(), IdentifierLinker::new(store))
}

#[tokio::test]
async fn attach_resolve_clear() {
    let (store, linker) = linker();
    let scope = ScopePath::catalogs(Tree::Private(UserId::new()));
    let id = store
        .create(&scope, serde_json::json!({"name": "Pins"}))
        .await
        .unwrap();
    let public_id = DocumentId::new();

    assert_eq!(linker.resolve(&scope, id).await.unwrap(), None);

    linker.attach_link(&scope, id, public_id).await.unwrap();
    assert_eq!(linker.resolve(&scope, id).await.unwrap(), Some(public_id));

    linker.clear_link(&scope, id).await.unwrap();
    assert_eq!(linker.resolve(&scope, id).await.unwrap(), None);
    let doc = store.get(&scope, id).await.unwrap();
    assert!(doc.field("publicId").is_none());
    assert_eq!(doc.get_str("/name"), Some("Pins"));
}

#[tokio::test]
async fn attach_to_missing_record_fails() {
    let (_, linker) = linker();
    let scope = ScopePath::catalogs(Tree::Private(UserId::new()));

    let err = linker
        .attach_link(&scope, DocumentId::new(), DocumentId::new())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn public_scope_follows_ancestor_links() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Pins", true))
        .await
        .unwrap();
    let item = f
        .curator
        .create_item(f.owner, catalog, new_item("Enamel"), vec![])
        .await
        .unwrap();
    let catalog_link = f.curator.fetch_catalog(f.owner, catalog).await.unwrap().public_id.unwrap();
    let item_link = f.curator.fetch_item(f.owner, catalog, item).await.unwrap().public_id.unwrap();

    let linker = f.curator.writer().linker();
    let private = Tree::Private(f.owner);

    assert_eq!(
        linker
            .resolve_public_scope(&ScopePath::catalogs(private))
            .await
            .unwrap(),
        PublicScope::Linked(ScopePath::catalogs(Tree::Public))
    );
    assert_eq!(
        linker
            .resolve_public_scope(&ScopePath::attributes(private, catalog, item))
            .await
            .unwrap(),
        PublicScope::Linked(ScopePath::attributes(Tree::Public, catalog_link, item_link))
    );
}

#[tokio::test]
async fn public_scope_reports_first_unlinked_level() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Pins", false))
        .await
        .unwrap();
    let item = f
        .curator
        .create_item(f.owner, catalog, new_item("Enamel"), vec![])
        .await
        .unwrap();

    let resolved = f
        .curator
        .writer()
        .linker()
        .resolve_public_scope(&ScopePath::attributes(Tree::Private(f.owner), catalog, item))
        .await
        .unwrap();
    assert_eq!(resolved, PublicScope::Unlinked(Level::Catalog));
    assert_eq!(resolved.linked(), None);
}

#[tokio::test]
async fn public_scope_of_missing_ancestor_is_not_found() {
    let f = setup();
    let err = f
        .curator
        .writer()
        .linker()
        .resolve_public_scope(&ScopePath::items(Tree::Private(f.owner), DocumentId::new()))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn live_mirror_check_notices_out_of_band_delete() {
    let f = setup();
    let catalog = f
        .curator
        .create_catalog(f.owner, new_catalog("Pins", true))
        .await
        .unwrap();
    let scope = ScopePath::catalogs(Tree::Private(f.owner));
    let linker = f.curator.writer().linker();
    assert!(linker.has_live_mirror(&scope, catalog).await.unwrap());

    let link = linker.resolve(&scope, catalog).await.unwrap().unwrap();
    f.store
        .delete(&ScopePath::catalogs(Tree::Public), link)
        .await
        .unwrap();

    assert!(!linker.has_live_mirror(&scope, catalog).await.unwrap());
    // The stale link itself is left for the writer to repair.
    assert_eq!(linker.resolve(&scope, catalog).await.unwrap(), Some(link));
}
