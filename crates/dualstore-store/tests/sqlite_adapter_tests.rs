mod common;

use std::sync::Arc;

use common::{attrs, post};
use dualstore_core::contract::{Adapter, Repository};
use dualstore_core::errors::ExErrorKind;
use dualstore_core::model::{Options, Record};
use dualstore_store::{RecordStore, SqliteAdapter};
use serde_json::json;

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("offline.db");

    {
        let adapter = SqliteAdapter::open(&path).unwrap();
        adapter.create_record(&post("1", "ann")).await.unwrap();
    }

    let adapter = SqliteAdapter::open(&path).unwrap();
    let found = adapter.find_record("post", "1").await.unwrap().unwrap();
    assert_eq!(found.attribute("author"), Some(&json!("ann")));
}

#[tokio::test]
async fn test_create_assigns_id_and_rejects_duplicates() {
    let adapter = SqliteAdapter::open_in_memory().unwrap();

    let created = adapter
        .create_record(&Record::new("post", None, attrs(json!({ "title": "A" }))))
        .await
        .unwrap();
    assert!(created.id().is_some());

    let err = adapter.create_record(&created).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
}

#[tokio::test]
async fn test_update_upserts_and_delete_removes() {
    let adapter = SqliteAdapter::open_in_memory().unwrap();

    adapter.update_record(&post("1", "ann")).await.unwrap();
    adapter.update_record(&post("1", "bob")).await.unwrap();
    assert_eq!(adapter.find_all("post").await.unwrap().len(), 1);

    let found = adapter.find_record("post", "1").await.unwrap().unwrap();
    assert_eq!(found.attribute("author"), Some(&json!("bob")));

    adapter.delete_record(&found).await.unwrap();
    assert!(adapter.find_record("post", "1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_query_matches_attributes_and_ignores_control_keys() {
    let adapter = SqliteAdapter::open_in_memory().unwrap();
    for record in [post("1", "ann"), post("2", "bob"), post("3", "ann")] {
        adapter.update_record(&record).await.unwrap();
    }
    let query = Options::new()
        .with("author", "ann")
        .with("useOnlineStore", false)
        .with("reload", true);

    let found = adapter.query("post", &query).await.unwrap();
    let first = adapter.query_record("post", &query).await.unwrap();

    let ids: Vec<_> = found.iter().filter_map(Record::id).collect();
    assert_eq!(ids, vec!["1", "3"]);
    assert_eq!(first.and_then(|r| r.id), Some("1".to_string()));
}

#[tokio::test]
async fn test_models_do_not_share_rows() {
    let adapter = SqliteAdapter::open_in_memory().unwrap();
    adapter.update_record(&post("1", "ann")).await.unwrap();

    assert!(adapter.find_record("comment", "1").await.unwrap().is_none());
    assert!(adapter.find_all("comment").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_record_store_over_sqlite() {
    let adapter = Arc::new(SqliteAdapter::open_in_memory().unwrap());
    adapter.update_record(&post("7", "ann")).await.unwrap();
    let store = RecordStore::new("local").with_adapter("post", adapter);

    let record = store.find_record("post", "7", None).await.unwrap();

    assert_eq!(record.attribute("author"), Some(&json!("ann")));
    assert!(store.record_is_loaded("post", "7", None).await.unwrap());
}
