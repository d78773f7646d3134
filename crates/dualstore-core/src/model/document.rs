//! JSON:API-style documents
//!
//! `{"data": resource | [resource] | null, "included": [resource]}` is the
//! shape accepted by `push` and produced by serializers.

use serde_json::{json, Value};

use super::record::Record;
use crate::errors::{DualStoreError, Result};

/// Extract every record from a document, primary data first
///
/// # Errors
///
/// Returns `InvalidDocument` when the document is not an object, lacks
/// `data`, or contains a malformed resource.
pub fn records_from_document(document: &Value) -> Result<Vec<Record>> {
    let object = document
        .as_object()
        .ok_or_else(|| DualStoreError::InvalidDocument {
            reason: "document must be an object".to_string(),
        })?;

    let data = object
        .get("data")
        .ok_or_else(|| DualStoreError::InvalidDocument {
            reason: "document.data is missing".to_string(),
        })?;

    let mut records = match data {
        Value::Null => Vec::new(),
        Value::Array(resources) => resources
            .iter()
            .map(Record::from_resource)
            .collect::<Result<Vec<_>>>()?,
        resource => vec![Record::from_resource(resource)?],
    };

    if let Some(included) = object.get("included") {
        let included = included
            .as_array()
            .ok_or_else(|| DualStoreError::InvalidDocument {
                reason: "document.included must be an array".to_string(),
            })?;
        for resource in included {
            records.push(Record::from_resource(resource)?);
        }
    }

    Ok(records)
}

pub fn document_from_records(records: &[Record]) -> Value {
    json!({
        "data": records.iter().map(Record::to_resource).collect::<Vec<_>>(),
    })
}

pub fn document_from_record(record: &Record) -> Value {
    json!({ "data": record.to_resource() })
}
