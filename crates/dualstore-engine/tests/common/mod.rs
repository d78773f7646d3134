#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dualstore_core::connectivity::OfflineGlobals;
use dualstore_core::contract::{Adapter, RepoFuture, Repository, Serializer};
use dualstore_core::descriptor::ShapeClass;
use dualstore_core::errors::{ExError, ExErrorKind, Result};
use dualstore_core::model::{Attributes, Options, Record, RecordReference};
use dualstore_core::sync::{RemoteWrite, Syncer};
use dualstore_engine::{Router, RouterBuilder};
use dualstore_store::{JsonApiSerializer, MemoryAdapter};
use futures::future::{ready, FutureExt};
use serde_json::{json, Value};

/// One call received by a [`RecordingRepository`]
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub args: Vec<Value>,
}

impl Call {
    /// The options mapping of a query-shaped call, if it carried one
    pub fn options(&self) -> Option<Options> {
        self.args
            .iter()
            .rev()
            .find(|arg| arg.is_object())
            .and_then(|arg| serde_json::from_value(arg.clone()).ok())
    }
}

pub fn flag(value: Option<bool>) -> Value {
    value.map(Value::Bool).unwrap_or(Value::Null)
}

fn options_value(options: &Option<Options>) -> Value {
    options
        .as_ref()
        .map(|o| Value::Object(o.as_map().clone()))
        .unwrap_or(Value::Null)
}

fn record_value(record: &Record) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

/// Repository double that records every call and answers with canned data
///
/// Fetched records carry a `source` attribute naming the repository.
pub struct RecordingRepository {
    pub name: &'static str,
    calls: Mutex<Vec<Call>>,
    pub adapter: Arc<MemoryAdapter>,
    pub serializer: Arc<JsonApiSerializer>,
}

impl RecordingRepository {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            calls: Mutex::new(Vec::new()),
            adapter: Arc::new(MemoryAdapter::new()),
            serializer: Arc::new(JsonApiSerializer),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.op).collect()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls().pop()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, op: &'static str, args: Vec<Value>) {
        self.calls.lock().unwrap().push(Call { op, args });
    }

    fn sourced(&self, model_name: &str, id: &str) -> Record {
        let attributes = json!({ "source": self.name }).as_object().cloned().unwrap();
        Record::loaded(model_name, id, attributes)
    }

    fn answer<'a, T: Send + 'a>(&'a self, op: &'static str, args: Vec<Value>, value: T) -> RepoFuture<'a, T> {
        self.record(op, args);
        ready(Ok(value)).boxed()
    }
}

impl Repository for RecordingRepository {
    fn find_all<'a>(&'a self, model_name: &'a str, options: Option<Options>) -> RepoFuture<'a, Vec<Record>> {
        let records = vec![self.sourced(model_name, "1"), self.sourced(model_name, "2")];
        self.answer("find_all", vec![json!(model_name), options_value(&options)], records)
    }

    fn find_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        options: Option<Options>,
    ) -> RepoFuture<'a, Record> {
        let record = self.sourced(model_name, id);
        self.answer("find_record", vec![json!(model_name), json!(id), options_value(&options)], record)
    }

    fn reload_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        let reloaded = self.sourced(&record.model_name, record.id().unwrap_or("?"));
        self.answer("reload_record", vec![record_value(record)], reloaded)
    }

    fn query<'a>(&'a self, model_name: &'a str, query: Options) -> RepoFuture<'a, Vec<Record>> {
        let records = vec![self.sourced(model_name, "q")];
        self.answer("query", vec![json!(model_name), options_value(&Some(query))], records)
    }

    fn query_record<'a>(&'a self, model_name: &'a str, query: Options) -> RepoFuture<'a, Option<Record>> {
        let record = Some(self.sourced(model_name, "q"));
        self.answer("query_record", vec![json!(model_name), options_value(&Some(query))], record)
    }

    fn create_record<'a>(
        &'a self,
        model_name: &'a str,
        properties: Attributes,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Record> {
        let args = vec![json!(model_name), Value::Object(properties.clone()), flag(use_online_store)];
        let record = Record::new(model_name, Some("new".to_string()), properties);
        self.answer("create_record", args, record)
    }

    fn delete_record<'a>(&'a self, record: &'a Record, use_online_store: Option<bool>) -> RepoFuture<'a, ()> {
        self.answer("delete_record", vec![record_value(record), flag(use_online_store)], ())
    }

    fn get_reference<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, RecordReference> {
        let reference = RecordReference {
            model_name: model_name.to_string(),
            id: id.to_string(),
            value: None,
        };
        let args = vec![json!(model_name), json!(id), flag(use_online_store)];
        self.answer("get_reference", args, reference)
    }

    fn has_record_for_id<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool> {
        let args = vec![json!(model_name), json!(id), flag(use_online_store)];
        self.answer("has_record_for_id", args, true)
    }

    fn normalize<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Value> {
        let args = vec![json!(model_name), payload.clone(), flag(use_online_store)];
        self.answer("normalize", args, payload)
    }

    fn peek_all<'a>(&'a self, model_name: &'a str, use_online_store: Option<bool>) -> RepoFuture<'a, Vec<Record>> {
        self.answer("peek_all", vec![json!(model_name), flag(use_online_store)], Vec::new())
    }

    fn peek_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Option<Record>> {
        let args = vec![json!(model_name), json!(id), flag(use_online_store)];
        self.answer("peek_record", args, None)
    }

    fn push<'a>(&'a self, data: Value, use_online_store: Option<bool>) -> RepoFuture<'a, Vec<Record>> {
        self.answer("push", vec![data, flag(use_online_store)], Vec::new())
    }

    fn push_payload<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        let args = vec![json!(model_name), payload, flag(use_online_store)];
        self.answer("push_payload", args, ())
    }

    fn record_is_loaded<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool> {
        let args = vec![json!(model_name), json!(id), flag(use_online_store)];
        self.answer("record_is_loaded", args, false)
    }

    fn unload_all<'a>(&'a self, model_name: Option<&'a str>, use_online_store: Option<bool>) -> RepoFuture<'a, ()> {
        let model = model_name.map(Value::from).unwrap_or(Value::Null);
        self.answer("unload_all", vec![model, flag(use_online_store)], ())
    }

    fn unload_record<'a>(&'a self, record: &'a Record, use_online_store: Option<bool>) -> RepoFuture<'a, ()> {
        self.answer("unload_record", vec![record_value(record), flag(use_online_store)], ())
    }

    fn adapter_for(&self, model_name: &str, use_online_store: Option<bool>) -> Result<Arc<dyn Adapter>> {
        self.record("adapter_for", vec![json!(model_name), flag(use_online_store)]);
        Ok(self.adapter.clone())
    }

    fn serializer_for(&self, model_name: &str, use_online_store: Option<bool>) -> Result<Arc<dyn Serializer>> {
        self.record("serializer_for", vec![json!(model_name), flag(use_online_store)]);
        Ok(self.serializer.clone())
    }
}

/// What a [`RecordingSyncer`] was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Down {
        shape: ShapeClass,
        model_name: String,
        ids: Vec<String>,
    },
    Write {
        model_name: String,
        write: RemoteWrite,
    },
}

#[derive(Default)]
pub struct RecordingSyncer {
    events: Mutex<Vec<SyncEvent>>,
    fail: bool,
}

impl RecordingSyncer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A syncer that records the request, then fails it
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }

    fn outcome(&self, event: SyncEvent) -> Result<()> {
        self.events.lock().unwrap().push(event);
        if self.fail {
            return Err(ExError::new(ExErrorKind::Sync).with_message("local store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl Syncer for RecordingSyncer {
    async fn sync_down(&self, shape: ShapeClass, model_name: &str, records: &[Record]) -> Result<()> {
        self.outcome(SyncEvent::Down {
            shape,
            model_name: model_name.to_string(),
            ids: records.iter().filter_map(|r| r.id().map(str::to_string)).collect(),
        })
    }

    async fn sync_remote_write(&self, model_name: &str, write: &RemoteWrite) -> Result<()> {
        self.outcome(SyncEvent::Write {
            model_name: model_name.to_string(),
            write: write.clone(),
        })
    }
}

/// A router over two recording repositories
pub struct Fixture {
    pub router: Router,
    pub remote: Arc<RecordingRepository>,
    pub local: Arc<RecordingRepository>,
    pub syncer: Arc<RecordingSyncer>,
    pub globals: Arc<OfflineGlobals>,
}

impl Fixture {
    pub fn new(online: bool, offline_enabled: bool) -> Self {
        Self::with_syncer(online, offline_enabled, RecordingSyncer::new())
    }

    pub fn with_syncer(online: bool, offline_enabled: bool, syncer: Arc<RecordingSyncer>) -> Self {
        let remote = RecordingRepository::new("remote");
        let local = RecordingRepository::new("local");
        let globals = Arc::new(OfflineGlobals::new(offline_enabled, online));
        let router = RouterBuilder::new()
            .remote(remote.clone())
            .local(local.clone())
            .syncer(syncer.clone())
            .connectivity(globals.clone())
            .build()
            .unwrap();

        Self {
            router,
            remote,
            local,
            syncer,
            globals,
        }
    }

    /// Which repository has received `op`; `None` when neither or both did
    pub fn served_by(&self, op: &str) -> Option<&'static str> {
        let remote = self.remote.ops().contains(&op);
        let local = self.local.ops().contains(&op);
        match (remote, local) {
            (true, false) => Some("remote"),
            (false, true) => Some("local"),
            _ => None,
        }
    }

    pub fn clear(&self) {
        self.remote.clear();
        self.local.clear();
    }
}

pub fn post(id: &str) -> Record {
    Record::loaded("post", id, Attributes::new())
}
