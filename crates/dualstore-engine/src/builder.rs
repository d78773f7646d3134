//! Router construction
//!
//! The local repository, the syncer and the connectivity provider are
//! required. The remote repository is optional: when none is supplied a
//! fresh [`RecordStore`] named `remote` is created, using the adapter given
//! to [`RouterBuilder::remote_adapter`] as its application adapter.

use std::sync::Arc;
use std::time::Instant;

use dualstore_core::config::OfflineConfig;
use dualstore_core::connectivity::{ConnectivityProvider, OfflineGlobals};
use dualstore_core::contract::{Adapter, Repository};
use dualstore_core::errors::{DualStoreError, ExError, Result};
use dualstore_core::routing::LookupPolicy;
use dualstore_core::sync::Syncer;
use dualstore_core::{log_op_end, log_op_error, log_op_start};
use dualstore_store::RecordStore;

use crate::router::Router;

const OP: &str = "router_build";

#[derive(Default)]
pub struct RouterBuilder {
    remote: Option<Arc<dyn Repository>>,
    remote_adapter: Option<Arc<dyn Adapter>>,
    local: Option<Arc<dyn Repository>>,
    syncer: Option<Arc<dyn Syncer>>,
    connectivity: Option<Arc<dyn ConnectivityProvider>>,
    lookup_policy: LookupPolicy,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remote(mut self, remote: Arc<dyn Repository>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Application adapter for the default remote repository
    ///
    /// Ignored when an explicit remote repository is supplied.
    pub fn remote_adapter(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.remote_adapter = Some(adapter);
        self
    }

    pub fn local(mut self, local: Arc<dyn Repository>) -> Self {
        self.local = Some(local);
        self
    }

    pub fn syncer(mut self, syncer: Arc<dyn Syncer>) -> Self {
        self.syncer = Some(syncer);
        self
    }

    pub fn connectivity(mut self, connectivity: Arc<dyn ConnectivityProvider>) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    pub fn lookup_policy(mut self, policy: LookupPolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// Seed connectivity and the lookup policy from configuration
    ///
    /// Replaces any connectivity provider set earlier with a fresh
    /// [`OfflineGlobals`]. Use [`connectivity`](Self::connectivity) afterwards
    /// to share a provider the host application flips.
    pub fn config(mut self, config: &OfflineConfig) -> Self {
        self.connectivity = Some(Arc::new(OfflineGlobals::from_config(config)));
        self.lookup_policy = config.lookup_policy();
        self
    }

    /// Resolve every collaborator and build the router
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::MissingCollaborator` when the local repository,
    /// the syncer or the connectivity provider was not supplied.
    pub fn build(self) -> Result<Router> {
        let start = Instant::now();
        log_op_start!(OP);

        match self.resolve() {
            Ok(router) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                log_op_end!(OP, duration_ms = duration_ms);
                Ok(router)
            }
            Err(err) => {
                let duration_ms = start.elapsed().as_millis() as u64;
                log_op_error!(OP, err.clone(), duration_ms = duration_ms);
                Err(err)
            }
        }
    }

    fn resolve(self) -> Result<Router> {
        let local = self.local.ok_or_else(|| missing("local repository"))?;
        let syncer = self.syncer.ok_or_else(|| missing("syncer"))?;
        let connectivity = self
            .connectivity
            .ok_or_else(|| missing("connectivity provider"))?;

        let remote: Arc<dyn Repository> = match self.remote {
            Some(remote) => remote,
            None => {
                let store = RecordStore::new("remote");
                let store = match self.remote_adapter {
                    Some(adapter) => store.with_application_adapter(adapter),
                    None => store,
                };
                Arc::new(store)
            }
        };

        Ok(Router::new(remote, local, syncer, connectivity, self.lookup_policy))
    }
}

fn missing(collaborator: &str) -> ExError {
    DualStoreError::MissingCollaborator {
        collaborator: collaborator.to_string(),
    }
    .into()
}
