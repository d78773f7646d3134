//! Identity-map repository
//!
//! `RecordStore` keeps one live copy of each record keyed by
//! `(model_name, id)`. Fetches go through the model's adapter and land in the
//! map; peeks read the map only.
//!
//! ## Logging
//!
//! Fetch operations (`find_all`, `find_record`, `reload_record`, `query`,
//! `query_record`) own their lifecycle events: one `start`, then exactly one
//! `end` or `end_error`. Map-only operations do not log.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use dualstore_core::contract::{Adapter, RepoFuture, Repository, Serializer};
use dualstore_core::errors::{DualStoreError, Result};
use dualstore_core::model::{
    records_from_document, Attributes, Options, Record, RecordReference, RecordState,
};
use dualstore_core::{log_op_end, log_op_error, log_op_start};
use futures::future::{ready, FutureExt};
use serde_json::Value;

use crate::errors::lock_poisoned;
use crate::registry::AdapterRegistry;

type IdentityMap = HashMap<String, BTreeMap<String, Record>>;

/// Number of records a fetch produced, for `end` events
trait RecordCount {
    fn record_count(&self) -> usize;
}

impl RecordCount for Record {
    fn record_count(&self) -> usize {
        1
    }
}

impl RecordCount for Option<Record> {
    fn record_count(&self) -> usize {
        usize::from(self.is_some())
    }
}

impl RecordCount for Vec<Record> {
    fn record_count(&self) -> usize {
        self.len()
    }
}

async fn logged<T, F>(op: &'static str, store: &str, model_name: &str, fetch: F) -> Result<T>
where
    T: RecordCount,
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    log_op_start!(op, store = store, model_name = model_name);

    let result = fetch.await;
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(value) => {
            log_op_end!(op, duration_ms = duration_ms, record_count = value.record_count() as u64);
        }
        Err(err) => {
            log_op_error!(op, err.clone(), duration_ms = duration_ms, model_name = model_name);
        }
    }
    result
}

pub struct RecordStore {
    name: String,
    registry: AdapterRegistry,
    records: RwLock<IdentityMap>,
}

impl RecordStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_registry(name, AdapterRegistry::new())
    }

    pub fn with_registry(name: impl Into<String>, registry: AdapterRegistry) -> Self {
        Self {
            name: name.into(),
            registry,
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Register the adapter for one model
    pub fn with_adapter(mut self, model_name: impl Into<String>, adapter: Arc<dyn Adapter>) -> Self {
        self.registry.register_adapter(model_name, adapter);
        self
    }

    /// Register the adapter used by models without their own
    pub fn with_application_adapter(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.registry.set_application_adapter(adapter);
        self
    }

    pub fn with_serializer(
        mut self,
        model_name: impl Into<String>,
        serializer: Arc<dyn Serializer>,
    ) -> Self {
        self.registry.register_serializer(model_name, serializer);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IdentityMap>> {
        self.records.read().map_err(|_| lock_poisoned(&self.name))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IdentityMap>> {
        self.records.write().map_err(|_| lock_poisoned(&self.name))
    }

    /// Put a fetched or pushed record into the map as `Loaded`
    fn load_one(&self, mut record: Record) -> Result<Record> {
        let id = record.require_id()?.to_string();
        record.state = RecordState::Loaded;
        self.write()?
            .entry(record.model_name.clone())
            .or_default()
            .insert(id, record.clone());
        Ok(record)
    }

    fn load(&self, records: Vec<Record>) -> Result<Vec<Record>> {
        records
            .into_iter()
            .map(|record| self.load_one(record))
            .collect()
    }

    fn peek(&self, model_name: &str, id: &str) -> Result<Option<Record>> {
        Ok(self
            .read()?
            .get(model_name)
            .and_then(|table| table.get(id))
            .filter(|record| !record.is_deleted())
            .cloned())
    }

    fn peek_model(&self, model_name: &str) -> Result<Vec<Record>> {
        Ok(self
            .read()?
            .get(model_name)
            .map(|table| {
                table
                    .values()
                    .filter(|record| !record.is_deleted())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn insert_new(&self, model_name: &str, mut properties: Attributes) -> Result<Record> {
        let id = match properties.remove("id") {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => uuid::Uuid::now_v7().to_string(),
        };

        let mut map = self.write()?;
        let table = map.entry(model_name.to_string()).or_default();
        if table.contains_key(&id) {
            return Err(DualStoreError::DuplicateRecord {
                model_name: model_name.to_string(),
                id,
            }
            .into());
        }
        let record = Record::new(model_name, Some(id.clone()), properties);
        table.insert(id, record.clone());
        Ok(record)
    }

    fn mark_deleted(&self, record: &Record) -> Result<()> {
        let id = record.require_id()?;
        let mut map = self.write()?;
        let entry = map
            .get_mut(&record.model_name)
            .and_then(|table| table.get_mut(id))
            .ok_or_else(|| DualStoreError::RecordNotFound {
                model_name: record.model_name.clone(),
                id: id.to_string(),
            })?;
        entry.state = RecordState::Deleted;
        Ok(())
    }

    fn remove(&self, record: &Record) -> Result<()> {
        let id = record.require_id()?;
        if let Some(table) = self.write()?.get_mut(&record.model_name) {
            table.remove(id);
        }
        Ok(())
    }

    fn clear(&self, model_name: Option<&str>) -> Result<()> {
        let mut map = self.write()?;
        match model_name {
            Some(model_name) => {
                map.remove(model_name);
            }
            None => map.clear(),
        }
        Ok(())
    }

    fn push_document(&self, document: &Value) -> Result<Vec<Record>> {
        let records = records_from_document(document)?;
        tracing::debug!(store = %self.name, record_count = records.len() as u64, "push");
        self.load(records)
    }

    async fn fetch_record(&self, model_name: &str, id: &str, options: Option<&Options>) -> Result<Record> {
        let reload = options.is_some_and(Options::is_reload);
        if !reload {
            if let Some(cached) = self.peek(model_name, id)? {
                return Ok(cached);
            }
        }
        self.fetch_by_id(model_name, id).await
    }

    async fn fetch_by_id(&self, model_name: &str, id: &str) -> Result<Record> {
        let adapter = self.registry.adapter_for(model_name)?;
        let found = adapter.find_record(model_name, id).await?;
        let record = found.ok_or_else(|| DualStoreError::RecordNotFound {
            model_name: model_name.to_string(),
            id: id.to_string(),
        })?;
        self.load_one(record)
    }
}

impl Repository for RecordStore {
    fn find_all<'a>(
        &'a self,
        model_name: &'a str,
        _options: Option<Options>,
    ) -> RepoFuture<'a, Vec<Record>> {
        logged("find_all", &self.name, model_name, async move {
            let adapter = self.registry.adapter_for(model_name)?;
            let fetched = adapter.find_all(model_name).await?;
            self.load(fetched)?;
            self.peek_model(model_name)
        })
        .boxed()
    }

    fn find_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        options: Option<Options>,
    ) -> RepoFuture<'a, Record> {
        logged("find_record", &self.name, model_name, async move {
            self.fetch_record(model_name, id, options.as_ref()).await
        })
        .boxed()
    }

    fn reload_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        logged("reload_record", &self.name, &record.model_name, async move {
            let id = record.require_id()?;
            self.fetch_by_id(&record.model_name, id).await
        })
        .boxed()
    }

    fn query<'a>(&'a self, model_name: &'a str, query: Options) -> RepoFuture<'a, Vec<Record>> {
        logged("query", &self.name, model_name, async move {
            let adapter = self.registry.adapter_for(model_name)?;
            let fetched = adapter.query(model_name, &query).await?;
            self.load(fetched)
        })
        .boxed()
    }

    fn query_record<'a>(
        &'a self,
        model_name: &'a str,
        query: Options,
    ) -> RepoFuture<'a, Option<Record>> {
        logged("query_record", &self.name, model_name, async move {
            let adapter = self.registry.adapter_for(model_name)?;
            match adapter.query_record(model_name, &query).await? {
                Some(record) => self.load_one(record).map(Some),
                None => Ok(None),
            }
        })
        .boxed()
    }

    fn create_record<'a>(
        &'a self,
        model_name: &'a str,
        properties: Attributes,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Record> {
        ready(self.insert_new(model_name, properties)).boxed()
    }

    fn delete_record<'a>(
        &'a self,
        record: &'a Record,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        ready(self.mark_deleted(record)).boxed()
    }

    fn get_reference<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, RecordReference> {
        let reference = self.peek(model_name, id).map(|value| RecordReference {
            model_name: model_name.to_string(),
            id: id.to_string(),
            value,
        });
        ready(reference).boxed()
    }

    fn has_record_for_id<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool> {
        ready(self.peek(model_name, id).map(|found| found.is_some())).boxed()
    }

    fn normalize<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Value> {
        let serializer = self.registry.serializer_for(model_name);
        async move { serializer.normalize(model_name, payload).await }.boxed()
    }

    fn peek_all<'a>(
        &'a self,
        model_name: &'a str,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Vec<Record>> {
        ready(self.peek_model(model_name)).boxed()
    }

    fn peek_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Option<Record>> {
        ready(self.peek(model_name, id)).boxed()
    }

    fn push<'a>(&'a self, data: Value, _use_online_store: Option<bool>) -> RepoFuture<'a, Vec<Record>> {
        ready(self.push_document(&data)).boxed()
    }

    fn push_payload<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        let serializer = self.registry.serializer_for(model_name);
        async move {
            let document = serializer.normalize(model_name, payload).await?;
            self.push_document(&document).map(|_| ())
        }
        .boxed()
    }

    /// New records count as loaded; deleted ones do not
    fn record_is_loaded<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool> {
        ready(self.peek(model_name, id).map(|found| found.is_some())).boxed()
    }

    fn unload_all<'a>(
        &'a self,
        model_name: Option<&'a str>,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        ready(self.clear(model_name)).boxed()
    }

    fn unload_record<'a>(
        &'a self,
        record: &'a Record,
        _use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        ready(self.remove(record)).boxed()
    }

    fn adapter_for(
        &self,
        model_name: &str,
        _use_online_store: Option<bool>,
    ) -> Result<Arc<dyn Adapter>> {
        self.registry.adapter_for(model_name)
    }

    fn serializer_for(
        &self,
        model_name: &str,
        _use_online_store: Option<bool>,
    ) -> Result<Arc<dyn Serializer>> {
        Ok(self.registry.serializer_for(model_name))
    }
}
