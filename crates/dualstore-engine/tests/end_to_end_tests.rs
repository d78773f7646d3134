//! Remote memory store, local SQLite store, mirrored through the router

use std::sync::Arc;

use dualstore_core::connectivity::OfflineGlobals;
use dualstore_core::contract::{Adapter, Repository};
use dualstore_core::descriptor::ShapeClass;
use dualstore_core::model::{Attributes, Options, Record};
use dualstore_core::sync::{NoopSyncer, Syncer};
use dualstore_engine::{Router, RouterBuilder};
use dualstore_store::{LocalMirrorSyncer, MemoryAdapter, RecordStore, SqliteAdapter};
use serde_json::json;
use tempfile::TempDir;

struct Stack {
    router: Router,
    globals: Arc<OfflineGlobals>,
    remote_adapter: Arc<MemoryAdapter>,
    local_adapter: Arc<SqliteAdapter>,
    _dir: TempDir,
}

fn post(id: &str, author: &str) -> Record {
    let attributes: Attributes = json!({ "author": author }).as_object().cloned().unwrap();
    Record::loaded("post", id, attributes)
}

fn stack() -> Stack {
    let dir = TempDir::new().unwrap();
    let remote_adapter = Arc::new(
        MemoryAdapter::new()
            .with_records([post("1", "ann"), post("2", "bob")])
            .unwrap(),
    );
    let local_adapter = Arc::new(SqliteAdapter::open(dir.path().join("offline.db")).unwrap());

    let local = Arc::new(RecordStore::new("local").with_application_adapter(local_adapter.clone()));
    let globals = Arc::new(OfflineGlobals::new(true, true));
    let router = RouterBuilder::new()
        .remote_adapter(remote_adapter.clone())
        .local(local.clone())
        .syncer(Arc::new(LocalMirrorSyncer::new(local, local_adapter.clone())))
        .connectivity(globals.clone())
        .build()
        .unwrap();

    Stack {
        router,
        globals,
        remote_adapter,
        local_adapter,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_records_fetched_online_are_readable_offline() {
    let stack = stack();

    let online = stack.router.find_all("post", None).await.unwrap();
    assert_eq!(online.len(), 2);
    assert_eq!(stack.local_adapter.find_all("post").await.unwrap().len(), 2);

    stack.globals.set_online(false);
    let offline = stack.router.find_all("post", None).await.unwrap();

    let mut ids: Vec<_> = offline.iter().filter_map(Record::id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_offline_query_filters_mirrored_records() {
    let stack = stack();
    stack.router.find_all("post", None).await.unwrap();
    stack.globals.set_online(false);

    let found = stack
        .router
        .query("post", Options::new().with("author", "bob"))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), Some("2"));
}

#[tokio::test]
async fn test_unfetched_record_is_missing_offline() {
    let stack = stack();
    stack.router.find_record("post", "1", None).await.unwrap();
    stack.globals.set_online(false);

    assert!(stack.router.find_record("post", "1", None).await.is_ok());
    let err = stack.router.find_record("post", "2", None).await.unwrap_err();
    assert_eq!(err.code(), "ERR_NOT_FOUND");
}

#[tokio::test]
async fn test_bypass_fetch_is_not_mirrored() {
    let stack = stack();

    stack
        .router
        .find_all("post", Some(Options::new().with("bypass", true)))
        .await
        .unwrap();

    assert!(stack.local_adapter.find_all("post").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_writes_through_decorated_adapter_reach_local() {
    let stack = stack();
    let adapter = stack.router.adapter_for("post", None).unwrap();

    adapter.create_record(&post("3", "cy")).await.unwrap();
    adapter.delete_record(&post("1", "ann")).await.unwrap();

    assert!(stack.remote_adapter.find_record("post", "3").await.unwrap().is_some());
    assert!(stack.local_adapter.find_record("post", "3").await.unwrap().is_some());

    stack.globals.set_online(false);
    let peeked = stack.router.peek_record("post", "3", None).await.unwrap();
    assert_eq!(peeked.and_then(|r| r.attribute("author").cloned()), Some(json!("cy")));
}

#[tokio::test]
async fn test_offline_writes_stay_local() {
    let stack = stack();
    stack.globals.set_online(false);

    let properties: Attributes = json!({ "id": "9", "author": "dee" }).as_object().cloned().unwrap();
    let created = stack.router.create_record("post", properties, None).await.unwrap();

    assert_eq!(created.id(), Some("9"));
    assert!(stack.router.has_record_for_id("post", "9", None).await.unwrap());
    assert!(!stack.router.has_record_for_id("post", "9", Some(true)).await.unwrap());
    assert_eq!(stack.remote_adapter.len("post").unwrap(), 2);
}

#[tokio::test]
async fn test_mirror_into_router_lands_on_its_local_side() {
    let inner_remote_adapter = Arc::new(MemoryAdapter::new());
    let inner_local_adapter = Arc::new(MemoryAdapter::new());
    let inner_local =
        Arc::new(RecordStore::new("inner-local").with_application_adapter(inner_local_adapter.clone()));
    let inner = Arc::new(
        RouterBuilder::new()
            .remote_adapter(inner_remote_adapter.clone())
            .local(inner_local.clone())
            .syncer(Arc::new(NoopSyncer))
            .connectivity(Arc::new(OfflineGlobals::new(true, true)))
            .build()
            .unwrap(),
    );
    let syncer = LocalMirrorSyncer::new(inner, inner_local_adapter.clone());

    syncer
        .sync_down(ShapeClass::Single, "post", &[post("1", "ann")])
        .await
        .unwrap();

    assert_eq!(inner_local_adapter.len("post").unwrap(), 1);
    assert_eq!(inner_remote_adapter.len("post").unwrap(), 0);
    assert!(inner_local.record_is_loaded("post", "1", None).await.unwrap());
}
