//! Default serializer
//!
//! Raw payloads are flat objects (`{"id": .., "title": ..}`) or arrays of
//! them. Payloads that already carry `data` pass through as documents.

use dualstore_core::contract::{RepoFuture, Serializer};
use dualstore_core::errors::{DualStoreError, Result};
use dualstore_core::model::{document_from_records, Attributes, Record};
use futures::future::{ready, FutureExt};
use serde_json::{json, Value};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonApiSerializer;

impl JsonApiSerializer {
    pub fn new() -> Self {
        Self
    }
}

fn invalid(reason: impl Into<String>) -> DualStoreError {
    DualStoreError::InvalidDocument {
        reason: reason.into(),
    }
}

fn record_from_raw(model_name: &str, raw: &Value) -> Result<Record> {
    let object = raw
        .as_object()
        .ok_or_else(|| invalid(format!("{model_name} payload entries must be objects")))?;

    let id = match object.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(invalid(format!("{model_name} payload entry has no id")).into()),
    };
    let attributes: Attributes = object
        .iter()
        .filter(|(key, _)| key.as_str() != "id")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(Record::loaded(model_name, id, attributes))
}

/// Turn a raw payload into a document
///
/// # Errors
///
/// Returns `InvalidDocument` for scalars or entries without an id.
pub fn normalize_payload(model_name: &str, payload: Value) -> Result<Value> {
    if payload.get("data").is_some() {
        return Ok(payload);
    }
    match payload {
        Value::Null => Ok(json!({ "data": null })),
        Value::Array(items) => {
            let records = items
                .iter()
                .map(|item| record_from_raw(model_name, item))
                .collect::<Result<Vec<_>>>()?;
            Ok(document_from_records(&records))
        }
        Value::Object(_) => {
            let record = record_from_raw(model_name, &payload)?;
            Ok(json!({ "data": record.to_resource() }))
        }
        _ => Err(invalid(format!("cannot normalize {model_name} payload")).into()),
    }
}

impl Serializer for JsonApiSerializer {
    fn normalize<'a>(&'a self, model_name: &'a str, payload: Value) -> RepoFuture<'a, Value> {
        ready(normalize_payload(model_name, payload)).boxed()
    }

    fn serialize<'a>(&'a self, record: &'a Record) -> RepoFuture<'a, Value> {
        let mut raw = record.attributes.clone();
        if let Some(id) = record.id() {
            raw.insert("id".to_string(), Value::from(id));
        }
        ready(Ok(Value::Object(raw))).boxed()
    }
}
