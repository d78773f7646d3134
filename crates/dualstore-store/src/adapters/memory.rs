use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use dualstore_core::contract::{Adapter, RepoFuture};
use dualstore_core::errors::{DualStoreError, Result};
use dualstore_core::model::{Options, Record, RecordState};
use futures::future::{ready, FutureExt};

use super::assign_id;
use crate::errors::lock_poisoned;

type Tables = HashMap<String, BTreeMap<String, Record>>;

/// Adapter keeping records in process memory, one ordered table per model
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    tables: Mutex<Tables>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records, replacing any with the same id
    pub fn with_records(self, records: impl IntoIterator<Item = Record>) -> Result<Self> {
        {
            let mut tables = self.lock()?;
            for mut record in records {
                let id = assign_id(&record);
                record.id = Some(id.clone());
                record.state = RecordState::Loaded;
                tables
                    .entry(record.model_name.clone())
                    .or_default()
                    .insert(id, record);
            }
        }
        Ok(self)
    }

    /// Number of records stored for a model
    pub fn len(&self, model_name: &str) -> Result<usize> {
        Ok(self.lock()?.get(model_name).map_or(0, BTreeMap::len))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| lock_poisoned("memory_adapter"))
    }

    fn select(&self, model_name: &str, query: &Options) -> Result<Vec<Record>> {
        Ok(self
            .lock()?
            .get(model_name)
            .map(|table| {
                table
                    .values()
                    .filter(|record| record.matches(query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert(&self, record: &Record) -> Result<Record> {
        let id = assign_id(record);
        let mut tables = self.lock()?;
        let table = tables.entry(record.model_name.clone()).or_default();
        if table.contains_key(&id) {
            return Err(DualStoreError::DuplicateRecord {
                model_name: record.model_name.clone(),
                id,
            }
            .into());
        }
        let stored = Record::loaded(record.model_name.clone(), id.clone(), record.attributes.clone());
        table.insert(id, stored.clone());
        Ok(stored)
    }

    fn upsert(&self, record: &Record) -> Result<Record> {
        let id = record.require_id()?.to_string();
        let stored = Record::loaded(record.model_name.clone(), id.clone(), record.attributes.clone());
        self.lock()?
            .entry(record.model_name.clone())
            .or_default()
            .insert(id, stored.clone());
        Ok(stored)
    }

    fn remove(&self, record: &Record) -> Result<()> {
        let id = record.require_id()?;
        if let Some(table) = self.lock()?.get_mut(&record.model_name) {
            table.remove(id);
        }
        Ok(())
    }
}

impl Adapter for MemoryAdapter {
    fn find_record<'a>(&'a self, model_name: &'a str, id: &'a str) -> RepoFuture<'a, Option<Record>> {
        let found = self
            .lock()
            .map(|tables| tables.get(model_name).and_then(|table| table.get(id)).cloned());
        ready(found).boxed()
    }

    fn find_all<'a>(&'a self, model_name: &'a str) -> RepoFuture<'a, Vec<Record>> {
        ready(self.select(model_name, &Options::new())).boxed()
    }

    fn query<'a>(&'a self, model_name: &'a str, query: &'a Options) -> RepoFuture<'a, Vec<Record>> {
        ready(self.select(model_name, query)).boxed()
    }

    fn query_record<'a>(
        &'a self,
        model_name: &'a str,
        query: &'a Options,
    ) -> RepoFuture<'a, Option<Record>> {
        let first = self
            .select(model_name, query)
            .map(|records| records.into_iter().next());
        ready(first).boxed()
    }

    fn create_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        ready(self.insert(record)).boxed()
    }

    fn update_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        ready(self.upsert(record)).boxed()
    }

    fn delete_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, ()> {
        ready(self.remove(record)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualstore_core::errors::ExErrorKind;
    use serde_json::json;

    fn post(id: &str, author: &str) -> Record {
        let attributes = json!({ "author": author }).as_object().cloned().unwrap();
        Record::loaded("post", id, attributes)
    }

    #[tokio::test]
    async fn test_create_assigns_id_when_missing() {
        let adapter = MemoryAdapter::new();
        let draft = Record::new("post", None, Default::default());

        let stored = adapter.create_record(&draft).await.unwrap();

        assert!(stored.id().is_some());
        assert_eq!(stored.state, RecordState::Loaded);
        assert_eq!(adapter.len("post").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let adapter = MemoryAdapter::new().with_records([post("1", "ann")]).unwrap();

        let err = adapter.create_record(&post("1", "bob")).await.unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
    }

    #[tokio::test]
    async fn test_update_upserts() {
        let adapter = MemoryAdapter::new();

        adapter.update_record(&post("1", "ann")).await.unwrap();
        adapter.update_record(&post("1", "bob")).await.unwrap();

        let found = adapter.find_record("post", "1").await.unwrap().unwrap();
        assert_eq!(found.attribute("author"), Some(&json!("bob")));
        assert_eq!(adapter.len("post").unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_ignores_control_keys() {
        let adapter = MemoryAdapter::new()
            .with_records([post("1", "ann"), post("2", "bob"), post("3", "ann")])
            .unwrap();
        let query = Options::new().with("author", "ann").with("bypass", true);

        let found = adapter.query("post", &query).await.unwrap();

        let ids: Vec<_> = found.iter().filter_map(Record::id).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let adapter = MemoryAdapter::new().with_records([post("1", "ann")]).unwrap();

        adapter.delete_record(&post("1", "ann")).await.unwrap();
        adapter.delete_record(&post("1", "ann")).await.unwrap();

        assert!(adapter.find_record("post", "1").await.unwrap().is_none());
    }
}
