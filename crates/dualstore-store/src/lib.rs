//! DualStore Store - default repository, adapters and the mirror syncer
//!
//! Provides:
//! - `RecordStore`, an identity-map repository over pluggable adapters
//! - `MemoryAdapter` and `SqliteAdapter` for local persistence
//! - `JsonApiSerializer`, the default serializer
//! - `LocalMirrorSyncer`, which copies remote results into a local repository

pub mod adapters;
pub mod db;
pub mod errors;
pub mod mirror;
pub mod record_store;
pub mod registry;
pub mod serializer;

// Re-export key types
pub use adapters::{MemoryAdapter, SqliteAdapter};
pub use errors::Result;
pub use mirror::LocalMirrorSyncer;
pub use record_store::RecordStore;
pub use registry::AdapterRegistry;
pub use serializer::JsonApiSerializer;
