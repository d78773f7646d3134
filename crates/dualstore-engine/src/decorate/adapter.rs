//! Adapter wrapper that syncs fetched and written records

use std::sync::Arc;

use dualstore_core::contract::{Adapter, RepoFuture};
use dualstore_core::descriptor::ShapeClass;
use dualstore_core::model::{Options, Record};
use dualstore_core::sync::{RemoteWrite, Syncer};
use futures::future::{ready, FutureExt};

use super::api_call::{decorate_api_call, warn_sync_failed, SyncPayload, SyncScope};

/// Remote adapter whose reads sync down and whose writes are reported
pub struct SyncingAdapter {
    inner: Arc<dyn Adapter>,
    syncer: Arc<dyn Syncer>,
}

impl SyncingAdapter {
    pub fn new(inner: Arc<dyn Adapter>, syncer: Arc<dyn Syncer>) -> Self {
        Self { inner, syncer }
    }

    pub fn inner(&self) -> &Arc<dyn Adapter> {
        &self.inner
    }

    fn fetch<'a, T>(
        &'a self,
        op: &'static str,
        shape: ShapeClass,
        model_name: &'a str,
        bypass: bool,
        call: RepoFuture<'a, T>,
    ) -> RepoFuture<'a, T>
    where
        T: SyncPayload + Send + Sync + 'a,
    {
        let scope = SyncScope::new(op, model_name).bypass(bypass);
        match decorate_api_call(shape, scope, Arc::clone(&self.syncer), |call: RepoFuture<'a, T>| call) {
            Ok(decorated) => decorated(call),
            Err(err) => ready(Err(err)).boxed(),
        }
    }

    fn write<'a, T>(
        &'a self,
        op: &'static str,
        record: &'a Record,
        call: RepoFuture<'a, T>,
        report: impl FnOnce(&T) -> RemoteWrite + Send + 'a,
    ) -> RepoFuture<'a, T>
    where
        T: Send + 'a,
    {
        async move {
            let value = call.await?;
            let write = report(&value);
            if let Err(err) = self
                .syncer
                .sync_remote_write(&record.model_name, &write)
                .await
            {
                let scope = SyncScope::new(op, record.model_name.as_str());
                warn_sync_failed(&scope, ShapeClass::BulkWrite, &err);
            }
            Ok(value)
        }
        .boxed()
    }
}

impl Adapter for SyncingAdapter {
    fn find_record<'a>(&'a self, model_name: &'a str, id: &'a str) -> RepoFuture<'a, Option<Record>> {
        let call = self.inner.find_record(model_name, id);
        self.fetch("find_record", ShapeClass::Single, model_name, false, call)
    }

    fn find_all<'a>(&'a self, model_name: &'a str) -> RepoFuture<'a, Vec<Record>> {
        let call = self.inner.find_all(model_name);
        self.fetch("find_all", ShapeClass::Multiple, model_name, false, call)
    }

    fn query<'a>(&'a self, model_name: &'a str, query: &'a Options) -> RepoFuture<'a, Vec<Record>> {
        let call = self.inner.query(model_name, query);
        self.fetch("query", ShapeClass::Multiple, model_name, query.is_bypass(), call)
    }

    fn query_record<'a>(
        &'a self,
        model_name: &'a str,
        query: &'a Options,
    ) -> RepoFuture<'a, Option<Record>> {
        let call = self.inner.query_record(model_name, query);
        self.fetch("query_record", ShapeClass::Single, model_name, query.is_bypass(), call)
    }

    fn create_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        let call = self.inner.create_record(record);
        self.write("create_record", record, call, |saved| RemoteWrite::Saved(saved.clone()))
    }

    fn update_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        let call = self.inner.update_record(record);
        self.write("update_record", record, call, |saved| RemoteWrite::Saved(saved.clone()))
    }

    fn delete_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, ()> {
        let call = self.inner.delete_record(record);
        self.write("delete_record", record, call, move |_| RemoteWrite::Deleted(record.clone()))
    }
}
