//! Connectivity-aware router
//!
//! The `Router` implements [`Repository`] and forwards every call to either
//! the remote or the local repository. Each call is routed from scratch:
//! connectivity is read from the provider at dispatch time and never cached.
//!
//! - Query-shaped operations read their override from the options mapping
//!   and go through the call decorator when routed remote.
//! - Pass-through operations read a trailing `Option<bool>` and forward the
//!   argument list untouched to the chosen repository.
//! - Adapter and serializer lookups always resolve the remote instance first.
//!
//! ## Logging
//!
//! Each dispatch emits one `debug` event named `routed` carrying `op`,
//! `route`, `shape`, `decorated` and `request_id`. Lifecycle events belong to
//! the repositories.

use std::sync::Arc;

use dualstore_core::connectivity::ConnectivityProvider;
use dualstore_core::contract::{Adapter, RepoFuture, Repository, Serializer};
use dualstore_core::descriptor::{CallDescriptor, Operation, OverrideSlot};
use dualstore_core::errors::Result;
use dualstore_core::model::{Attributes, Options, Record, RecordReference};
use dualstore_core::routing::{decide, decide_lookup, take_options_override, LookupPolicy, Route};
use dualstore_core::sync::Syncer;
use dualstore_core_types::schema::EVENT_ROUTED;
use dualstore_core_types::RequestId;
use futures::future::{ready, FutureExt};
use serde_json::Value;

use crate::decorate::{decorate_api_call, SyncPayload, SyncScope, SyncingAdapter, SyncingSerializer};

/// Routes repository calls between a remote and a local repository
///
/// Built with [`RouterBuilder`](crate::RouterBuilder).
pub struct Router {
    remote: Arc<dyn Repository>,
    local: Arc<dyn Repository>,
    syncer: Arc<dyn Syncer>,
    connectivity: Arc<dyn ConnectivityProvider>,
    lookup_policy: LookupPolicy,
}

impl Router {
    pub(crate) fn new(
        remote: Arc<dyn Repository>,
        local: Arc<dyn Repository>,
        syncer: Arc<dyn Syncer>,
        connectivity: Arc<dyn ConnectivityProvider>,
        lookup_policy: LookupPolicy,
    ) -> Self {
        Self {
            remote,
            local,
            syncer,
            connectivity,
            lookup_policy,
        }
    }

    pub fn remote(&self) -> &Arc<dyn Repository> {
        &self.remote
    }

    pub fn local(&self) -> &Arc<dyn Repository> {
        &self.local
    }

    pub fn connectivity(&self) -> &Arc<dyn ConnectivityProvider> {
        &self.connectivity
    }

    pub fn lookup_policy(&self) -> LookupPolicy {
        self.lookup_policy
    }

    fn routed(&self, descriptor: &CallDescriptor, route: Route, decorated: bool, request_id: &RequestId) {
        tracing::debug!(
            op = descriptor.name,
            event = EVENT_ROUTED,
            route = route.as_str(),
            shape = descriptor.shape.as_str(),
            decorated,
            request_id = request_id.as_str(),
        );
    }

    fn repository(&self, route: Route) -> &dyn Repository {
        match route {
            Route::Remote => self.remote.as_ref(),
            Route::Local => self.local.as_ref(),
        }
    }

    /// Pick the repository for a pass-through operation
    fn pass_through(&self, operation: Operation, use_online_store: Option<bool>) -> &dyn Repository {
        let descriptor = operation.descriptor();
        let route = decide(use_online_store, self.connectivity.is_online());
        self.routed(descriptor, route, false, &RequestId::new());
        self.repository(route)
    }

    /// Route a query-shaped operation
    ///
    /// `call` issues the operation against whichever repository is chosen,
    /// with the options as they should be forwarded.
    fn fetch<'a, T, F>(
        &'a self,
        operation: Operation,
        model_name: &'a str,
        options: Option<Options>,
        call: F,
    ) -> RepoFuture<'a, T>
    where
        T: SyncPayload + Send + Sync + 'a,
        F: FnOnce(&'a dyn Repository, Option<Options>) -> RepoFuture<'a, T>,
    {
        let descriptor = operation.descriptor();
        let (explicit, options) = take_options_override(&descriptor.slot, options);
        let route = decide(explicit, self.connectivity.is_online());
        let request_id = RequestId::new();

        if route == Route::Local {
            self.routed(descriptor, route, false, &request_id);
            return call(self.local.as_ref(), options);
        }

        let offline_enabled = self.connectivity.is_offline_enabled();
        let options = match descriptor.slot {
            OverrideSlot::OptionsKey {
                inject_bypass: true,
                ..
            } if !offline_enabled => Some(options.unwrap_or_default().with_bypass()),
            _ => options,
        };
        let bypass = !offline_enabled || options.as_ref().is_some_and(Options::is_bypass);

        self.routed(descriptor, route, true, &request_id);
        let scope = SyncScope {
            op: descriptor.name,
            model_name: model_name.to_string(),
            bypass,
            request_id,
        };
        let remote = self.remote.as_ref();
        let method = move |options: Option<Options>| call(remote, options);
        match decorate_api_call(descriptor.shape, scope, Arc::clone(&self.syncer), method) {
            Ok(decorated) => decorated(options),
            Err(err) => ready(Err(err)).boxed(),
        }
    }

    /// Route an adapter or serializer lookup; `None` means "use the remote one undecorated"
    fn lookup_route(&self, operation: Operation, use_online_store: Option<bool>) -> Option<Route> {
        let descriptor = operation.descriptor();
        let request_id = RequestId::new();
        if !self.connectivity.is_offline_enabled() {
            self.routed(descriptor, Route::Remote, false, &request_id);
            return None;
        }
        let route = decide_lookup(use_online_store, self.connectivity.is_online(), self.lookup_policy);
        self.routed(descriptor, route, route.is_remote(), &request_id);
        Some(route)
    }
}

impl Repository for Router {
    fn find_all<'a>(
        &'a self,
        model_name: &'a str,
        options: Option<Options>,
    ) -> RepoFuture<'a, Vec<Record>> {
        self.fetch(Operation::FindAll, model_name, options, move |repo, options| {
            repo.find_all(model_name, options)
        })
    }

    fn find_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        options: Option<Options>,
    ) -> RepoFuture<'a, Record> {
        self.fetch(Operation::FindRecord, model_name, options, move |repo, options| {
            repo.find_record(model_name, id, options)
        })
    }

    fn reload_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record> {
        self.fetch(Operation::ReloadRecord, &record.model_name, None, move |repo, _| {
            repo.reload_record(record)
        })
    }

    fn query<'a>(&'a self, model_name: &'a str, query: Options) -> RepoFuture<'a, Vec<Record>> {
        self.fetch(Operation::Query, model_name, Some(query), move |repo, query| {
            repo.query(model_name, query.unwrap_or_default())
        })
    }

    fn query_record<'a>(
        &'a self,
        model_name: &'a str,
        query: Options,
    ) -> RepoFuture<'a, Option<Record>> {
        self.fetch(Operation::QueryRecord, model_name, Some(query), move |repo, query| {
            repo.query_record(model_name, query.unwrap_or_default())
        })
    }

    fn create_record<'a>(
        &'a self,
        model_name: &'a str,
        properties: Attributes,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Record> {
        self.pass_through(Operation::CreateRecord, use_online_store)
            .create_record(model_name, properties, use_online_store)
    }

    fn delete_record<'a>(
        &'a self,
        record: &'a Record,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        self.pass_through(Operation::DeleteRecord, use_online_store)
            .delete_record(record, use_online_store)
    }

    fn get_reference<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, RecordReference> {
        self.pass_through(Operation::GetReference, use_online_store)
            .get_reference(model_name, id, use_online_store)
    }

    fn has_record_for_id<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool> {
        self.pass_through(Operation::HasRecordForId, use_online_store)
            .has_record_for_id(model_name, id, use_online_store)
    }

    fn normalize<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Value> {
        self.pass_through(Operation::Normalize, use_online_store)
            .normalize(model_name, payload, use_online_store)
    }

    fn peek_all<'a>(
        &'a self,
        model_name: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Vec<Record>> {
        self.pass_through(Operation::PeekAll, use_online_store)
            .peek_all(model_name, use_online_store)
    }

    fn peek_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Option<Record>> {
        self.pass_through(Operation::PeekRecord, use_online_store)
            .peek_record(model_name, id, use_online_store)
    }

    fn push<'a>(&'a self, data: Value, use_online_store: Option<bool>) -> RepoFuture<'a, Vec<Record>> {
        self.pass_through(Operation::Push, use_online_store)
            .push(data, use_online_store)
    }

    fn push_payload<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        self.pass_through(Operation::PushPayload, use_online_store)
            .push_payload(model_name, payload, use_online_store)
    }

    fn record_is_loaded<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool> {
        self.pass_through(Operation::RecordIsLoaded, use_online_store)
            .record_is_loaded(model_name, id, use_online_store)
    }

    fn unload_all<'a>(
        &'a self,
        model_name: Option<&'a str>,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        self.pass_through(Operation::UnloadAll, use_online_store)
            .unload_all(model_name, use_online_store)
    }

    fn unload_record<'a>(
        &'a self,
        record: &'a Record,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()> {
        self.pass_through(Operation::UnloadRecord, use_online_store)
            .unload_record(record, use_online_store)
    }

    fn adapter_for(
        &self,
        model_name: &str,
        use_online_store: Option<bool>,
    ) -> Result<Arc<dyn Adapter>> {
        let remote = self.remote.adapter_for(model_name, None)?;
        match self.lookup_route(Operation::AdapterFor, use_online_store) {
            None => Ok(remote),
            Some(Route::Remote) => Ok(Arc::new(SyncingAdapter::new(remote, Arc::clone(&self.syncer)))),
            Some(Route::Local) => self.local.adapter_for(model_name, None),
        }
    }

    fn serializer_for(
        &self,
        model_name: &str,
        use_online_store: Option<bool>,
    ) -> Result<Arc<dyn Serializer>> {
        let remote = self.remote.serializer_for(model_name, None)?;
        match self.lookup_route(Operation::SerializerFor, use_online_store) {
            None => Ok(remote),
            Some(Route::Remote) => Ok(Arc::new(SyncingSerializer::new(
                remote,
                Arc::clone(&self.syncer),
            ))),
            Some(Route::Local) => self.local.serializer_for(model_name, None),
        }
    }
}
