//! Synchronization port
//!
//! Decorated calls hand their outcome to a [`Syncer`]. What the syncer does
//! with it (mirroring, queueing, conflict handling) is up to the
//! implementation.

use async_trait::async_trait;

use crate::descriptor::ShapeClass;
use crate::errors::Result;
use crate::model::Record;

/// A write that the remote side accepted
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteWrite {
    /// Created or updated; carries the record as stored remotely
    Saved(Record),
    Deleted(Record),
}

impl RemoteWrite {
    pub fn record(&self) -> &Record {
        match self {
            RemoteWrite::Saved(record) | RemoteWrite::Deleted(record) => record,
        }
    }
}

#[async_trait]
pub trait Syncer: Send + Sync {
    /// Records were fetched from the remote repository
    async fn sync_down(&self, shape: ShapeClass, model_name: &str, records: &[Record])
        -> Result<()>;

    /// A write went through a decorated remote adapter
    async fn sync_remote_write(&self, model_name: &str, write: &RemoteWrite) -> Result<()>;
}

/// Syncer that does nothing; useful when offline support is compiled in but unused
pub struct NoopSyncer;

#[async_trait]
impl Syncer for NoopSyncer {
    async fn sync_down(&self, _: ShapeClass, _: &str, _: &[Record]) -> Result<()> {
        Ok(())
    }

    async fn sync_remote_write(&self, _: &str, _: &RemoteWrite) -> Result<()> {
        Ok(())
    }
}
