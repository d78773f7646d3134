//! Syncer that mirrors remote results into a local repository
//!
//! Records are written through the local adapter held since construction,
//! never one looked up per call, so a router standing in as the local
//! repository cannot redirect the writes to its remote side. Identity-map
//! calls carry an explicit `Some(false)` override.

use std::sync::Arc;

use async_trait::async_trait;
use dualstore_core::contract::{Adapter, Repository};
use dualstore_core::descriptor::ShapeClass;
use dualstore_core::errors::{ExError, ExErrorKind, Result};
use dualstore_core::model::{document_from_records, Record};
use dualstore_core::sync::{RemoteWrite, Syncer};
use dualstore_core_types::schema::EVENT_SYNCED;

const LOCAL: Option<bool> = Some(false);

pub struct LocalMirrorSyncer {
    local: Arc<dyn Repository>,
    adapter: Arc<dyn Adapter>,
}

impl LocalMirrorSyncer {
    /// Mirror into `local`, persisting through `adapter`
    pub fn new(local: Arc<dyn Repository>, adapter: Arc<dyn Adapter>) -> Self {
        Self { local, adapter }
    }

    async fn persist(&self, record: &Record) -> Result<()> {
        self.adapter.update_record(record).await?;
        Ok(())
    }

    async fn mirror_write(&self, write: &RemoteWrite) -> Result<()> {
        match write {
            RemoteWrite::Saved(record) => {
                self.persist(record).await?;
                let document = document_from_records(std::slice::from_ref(record));
                self.local.push(document, LOCAL).await?;
            }
            RemoteWrite::Deleted(record) => {
                self.adapter.delete_record(record).await?;
                self.local.unload_record(record, LOCAL).await?;
            }
        }
        Ok(())
    }
}

fn sync_error(op: &str, model_name: &str, source: ExError) -> ExError {
    ExError::new(ExErrorKind::Sync)
        .with_op(op)
        .with_model_name(model_name)
        .with_message(format!("mirroring into local repository failed: {}", source.message()))
        .with_source(source)
}

#[async_trait]
impl Syncer for LocalMirrorSyncer {
    async fn sync_down(
        &self,
        shape: ShapeClass,
        model_name: &str,
        records: &[Record],
    ) -> Result<()> {
        for record in records {
            self.persist(record)
                .await
                .map_err(|e| sync_error("sync_down", model_name, e))?;
        }
        self.local
            .push(document_from_records(records), LOCAL)
            .await
            .map_err(|e| sync_error("sync_down", model_name, e))?;

        tracing::debug!(
            event = EVENT_SYNCED,
            shape = shape.as_str(),
            model_name,
            record_count = records.len() as u64,
        );
        Ok(())
    }

    async fn sync_remote_write(&self, model_name: &str, write: &RemoteWrite) -> Result<()> {
        self.mirror_write(write)
            .await
            .map_err(|e| sync_error("sync_remote_write", model_name, e))?;

        tracing::debug!(
            event = EVENT_SYNCED,
            shape = ShapeClass::BulkWrite.as_str(),
            model_name,
            record_id = write.record().id().unwrap_or_default(),
        );
        Ok(())
    }
}
