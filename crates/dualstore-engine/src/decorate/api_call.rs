//! Call decorator for query-shaped operations

use std::sync::Arc;

use dualstore_core::contract::RepoFuture;
use dualstore_core::descriptor::ShapeClass;
use dualstore_core::errors::{DualStoreError, ExError, Result};
use dualstore_core::model::Record;
use dualstore_core::sync::Syncer;
use dualstore_core_types::RequestId;
use futures::future::FutureExt;

/// Per-call context handed to the decorator
#[derive(Debug, Clone)]
pub struct SyncScope {
    pub op: &'static str,
    pub model_name: String,
    /// Skip every sync step for this call
    pub bypass: bool,
    pub request_id: RequestId,
}

impl SyncScope {
    pub fn new(op: &'static str, model_name: impl Into<String>) -> Self {
        Self {
            op,
            model_name: model_name.into(),
            bypass: false,
            request_id: RequestId::new(),
        }
    }

    pub fn bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }
}

/// Results whose records can be synced down
pub trait SyncPayload {
    fn records(&self) -> &[Record];
}

impl SyncPayload for Record {
    fn records(&self) -> &[Record] {
        std::slice::from_ref(self)
    }
}

impl SyncPayload for Option<Record> {
    fn records(&self) -> &[Record] {
        match self {
            Some(record) => std::slice::from_ref(record),
            None => &[],
        }
    }
}

impl SyncPayload for Vec<Record> {
    fn records(&self) -> &[Record] {
        self.as_slice()
    }
}

/// Log a failed sync without failing the call
pub(crate) fn warn_sync_failed(scope: &SyncScope, shape: ShapeClass, err: &ExError) {
    tracing::warn!(
        op = scope.op,
        shape = shape.as_str(),
        model_name = scope.model_name.as_str(),
        request_id = scope.request_id.as_str(),
        err_code = err.code(),
        "sync failed; keeping remote result"
    );
}

/// Wrap `method` so its result is synced down after it resolves
///
/// The returned callable invokes `method` with its arguments, awaits it and,
/// unless `scope.bypass` is set, hands the loaded records to
/// [`Syncer::sync_down`] tagged with `shape`. The result is returned as the
/// method produced it.
///
/// # Errors
///
/// Returns `DecorationFailed` when `shape` is [`ShapeClass::None`].
pub fn decorate_api_call<'a, A, T, M>(
    shape: ShapeClass,
    scope: SyncScope,
    syncer: Arc<dyn Syncer>,
    method: M,
) -> Result<impl FnOnce(A) -> RepoFuture<'a, T>>
where
    M: FnOnce(A) -> RepoFuture<'a, T>,
    T: SyncPayload + Send + Sync + 'a,
{
    if shape == ShapeClass::None {
        let err: ExError = DualStoreError::DecorationFailed {
            op: scope.op.to_string(),
            reason: "operation has no shape class".to_string(),
        }
        .into();
        return Err(err.with_request_id(scope.request_id));
    }

    Ok(move |args: A| {
        let call = method(args);
        async move {
            let value = call.await?;
            if !scope.bypass {
                if let Err(err) = syncer
                    .sync_down(shape, &scope.model_name, value.records())
                    .await
                {
                    warn_sync_failed(&scope, shape, &err);
                }
            }
            Ok(value)
        }
        .boxed()
    })
}
