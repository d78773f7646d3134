//! DualStore Engine - connectivity-aware routing
//!
//! Provides the `Router`, which exposes the repository contract and sends
//! each call to the remote or the local repository, and the decoration layer
//! that hands remote results to a syncer.

pub mod builder;
pub mod decorate;
pub mod router;

pub use builder::RouterBuilder;
pub use decorate::{decorate_api_call, SyncScope, SyncingAdapter, SyncingSerializer};
pub use router::Router;
