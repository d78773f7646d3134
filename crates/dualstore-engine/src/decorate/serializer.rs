//! Serializer wrapper that syncs normalized server data

use std::sync::Arc;

use dualstore_core::contract::{RepoFuture, Serializer};
use dualstore_core::descriptor::ShapeClass;
use dualstore_core::model::{records_from_document, Record};
use dualstore_core::sync::Syncer;
use futures::future::FutureExt;
use serde_json::Value;

use super::api_call::{warn_sync_failed, SyncScope};

pub struct SyncingSerializer {
    inner: Arc<dyn Serializer>,
    syncer: Arc<dyn Syncer>,
}

impl SyncingSerializer {
    pub fn new(inner: Arc<dyn Serializer>, syncer: Arc<dyn Syncer>) -> Self {
        Self { inner, syncer }
    }

    pub fn inner(&self) -> &Arc<dyn Serializer> {
        &self.inner
    }
}

impl Serializer for SyncingSerializer {
    /// Normalize, then sync down every record the document carries
    fn normalize<'a>(&'a self, model_name: &'a str, payload: Value) -> RepoFuture<'a, Value> {
        let call = self.inner.normalize(model_name, payload);
        async move {
            let document = call.await?;
            let scope = SyncScope::new("normalize", model_name);
            let synced = match records_from_document(&document) {
                Ok(records) => {
                    self.syncer
                        .sync_down(ShapeClass::Multiple, model_name, &records)
                        .await
                }
                Err(err) => Err(err),
            };
            if let Err(err) = synced {
                warn_sync_failed(&scope, ShapeClass::Multiple, &err);
            }
            Ok(document)
        }
        .boxed()
    }

    fn serialize<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Value> {
        self.inner.serialize(record)
    }
}
