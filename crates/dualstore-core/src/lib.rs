//! DualStore Core - contracts and routing rules
//!
//! This crate provides the pieces every other DualStore crate builds on:
//! - The repository, adapter and serializer contracts
//! - The record model and options convention (`useOnlineStore`)
//! - The static call-descriptor table and routing decision helpers
//! - The connectivity provider and synchronization port
//! - Error and logging facilities, and TOML configuration

pub mod config;
pub mod connectivity;
pub mod contract;
pub mod descriptor;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod routing;
pub mod sync;

/// Re-exported for the logging macros
pub use dualstore_core_types as core_types;

// Re-export commonly used types
pub use config::OfflineConfig;
pub use connectivity::{ConnectivityProvider, OfflineGlobals};
pub use contract::{Adapter, RepoFuture, Repository, Serializer};
pub use descriptor::{CallDescriptor, Operation, OverrideSlot, ShapeClass};
pub use errors::{DualStoreError, ExError, ExErrorKind, Result};
pub use model::{Attributes, Options, Record, RecordReference, RecordState};
pub use routing::{decide, decide_lookup, LookupPolicy, Route};
pub use sync::{NoopSyncer, RemoteWrite, Syncer};
