//! Decoration layer.
//!
//! Wraps remote calls, adapters and serializers so that what they load or
//! write is handed to a [`Syncer`](dualstore_core::sync::Syncer). Decoration
//! is compositional: the wrapped instances are never modified.
//!
//! ## Failure policy
//!
//! Remote errors propagate unchanged. Sync errors are logged at `warn` and
//! never replace a successful remote result.

pub mod adapter;
pub mod api_call;
pub mod serializer;

pub use adapter::SyncingAdapter;
pub use api_call::{decorate_api_call, SyncPayload, SyncScope};
pub use serializer::SyncingSerializer;
