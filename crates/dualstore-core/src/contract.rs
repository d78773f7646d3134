//! Repository contract shared by the remote and local repositories
//!
//! The router implements this contract too, so callers can swap it in for a
//! single repository without changing call sites.
//!
//! Data operations return a [`RepoFuture`] rather than being `async fn`s:
//! an implementation may do synchronous work (such as picking a target) and
//! hand back a downstream future untouched.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::errors::Result;
use crate::model::{Attributes, Options, Record, RecordReference};

/// Asynchronous result of a repository, adapter or serializer call
pub type RepoFuture<'a, T> = BoxFuture<'a, Result<T>>;

/// The operation surface every backing repository implements
///
/// Operations that take a trailing `use_online_store` receive it verbatim
/// from the router. Backing repositories are free to ignore it.
pub trait Repository: Send + Sync {
    /// Fetch every record of a model
    fn find_all<'a>(
        &'a self,
        model_name: &'a str,
        options: Option<Options>,
    ) -> RepoFuture<'a, Vec<Record>>;

    /// Fetch one record by id
    fn find_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        options: Option<Options>,
    ) -> RepoFuture<'a, Record>;

    /// Re-fetch a record that is already loaded
    fn reload_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record>;

    /// Fetch the records matching `query`
    fn query<'a>(&'a self, model_name: &'a str, query: Options) -> RepoFuture<'a, Vec<Record>>;

    /// Fetch the first record matching `query`, if any
    fn query_record<'a>(
        &'a self,
        model_name: &'a str,
        query: Options,
    ) -> RepoFuture<'a, Option<Record>>;

    /// Create a new, unsaved record
    fn create_record<'a>(
        &'a self,
        model_name: &'a str,
        properties: Attributes,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Record>;

    /// Mark a record as deleted
    fn delete_record<'a>(
        &'a self,
        record: &'a Record,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()>;

    fn get_reference<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, RecordReference>;

    fn has_record_for_id<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool>;

    /// Convert a raw payload into a document `push` accepts
    fn normalize<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Value>;

    fn peek_all<'a>(
        &'a self,
        model_name: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Vec<Record>>;

    fn peek_record<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, Option<Record>>;

    /// Load a normalized document, returning the records it contained
    fn push<'a>(&'a self, data: Value, use_online_store: Option<bool>)
        -> RepoFuture<'a, Vec<Record>>;

    /// Normalize a raw payload with the model's serializer, then push it
    fn push_payload<'a>(
        &'a self,
        model_name: &'a str,
        payload: Value,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()>;

    fn record_is_loaded<'a>(
        &'a self,
        model_name: &'a str,
        id: &'a str,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, bool>;

    /// Unload every record of a model, or of every model when `None`
    fn unload_all<'a>(
        &'a self,
        model_name: Option<&'a str>,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()>;

    fn unload_record<'a>(
        &'a self,
        record: &'a Record,
        use_online_store: Option<bool>,
    ) -> RepoFuture<'a, ()>;

    /// Resolve the adapter for a model
    ///
    /// # Errors
    ///
    /// Returns `UnknownModel` when no adapter can serve the model.
    fn adapter_for(&self, model_name: &str, use_online_store: Option<bool>)
        -> Result<Arc<dyn Adapter>>;

    /// Resolve the serializer for a model
    ///
    /// # Errors
    ///
    /// Returns `UnknownModel` when no serializer can serve the model.
    fn serializer_for(
        &self,
        model_name: &str,
        use_online_store: Option<bool>,
    ) -> Result<Arc<dyn Serializer>>;
}

/// Moves records between a repository and its storage
pub trait Adapter: Send + Sync {
    /// `Ok(None)` when the record does not exist
    fn find_record<'a>(&'a self, model_name: &'a str, id: &'a str)
        -> RepoFuture<'a, Option<Record>>;

    fn find_all<'a>(&'a self, model_name: &'a str) -> RepoFuture<'a, Vec<Record>>;

    fn query<'a>(&'a self, model_name: &'a str, query: &'a Options)
        -> RepoFuture<'a, Vec<Record>>;

    fn query_record<'a>(
        &'a self,
        model_name: &'a str,
        query: &'a Options,
    ) -> RepoFuture<'a, Option<Record>>;

    /// Persist a new record, returning it as stored (with its id)
    fn create_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record>;

    /// Persist changes to a record, inserting it when absent
    fn update_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Record>;

    fn delete_record<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, ()>;
}

/// Converts between raw payloads and documents
pub trait Serializer: Send + Sync {
    /// Turn a raw payload of `model_name` into a document
    fn normalize<'a>(&'a self, model_name: &'a str, payload: Value) -> RepoFuture<'a, Value>;

    /// Turn a record into the raw payload shape
    fn serialize<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Value>;
}
