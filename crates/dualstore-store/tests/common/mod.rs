#![allow(dead_code)]

use std::sync::Arc;

use dualstore_core::model::{Attributes, Record};
use dualstore_store::{MemoryAdapter, RecordStore};
use serde_json::Value;

pub fn attrs(value: Value) -> Attributes {
    value.as_object().cloned().unwrap_or_default()
}

pub fn post(id: &str, author: &str) -> Record {
    Record::loaded("post", id, attrs(serde_json::json!({ "author": author })))
}

/// A store whose application adapter is an in-memory adapter seeded with `records`
pub fn memory_store(name: &str, records: Vec<Record>) -> (Arc<RecordStore>, Arc<MemoryAdapter>) {
    let adapter = Arc::new(MemoryAdapter::new().with_records(records).unwrap());
    let store = RecordStore::new(name).with_application_adapter(adapter.clone());
    (Arc::new(store), adapter)
}
