use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::options::Options;
use crate::errors::{DualStoreError, Result};

/// Attribute bag of a record
pub type Attributes = serde_json::Map<String, Value>;

/// Lifecycle state of a record inside a repository's identity map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    /// Created locally, not yet persisted by an adapter
    New,
    /// Loaded from an adapter or pushed into the repository
    Loaded,
    /// Marked for deletion; still present until unloaded
    Deleted,
}

/// A single entity managed by a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub model_name: String,
    pub id: Option<String>,
    pub attributes: Attributes,
    pub state: RecordState,
}

impl Record {
    /// Create a new, not yet persisted record
    pub fn new(model_name: impl Into<String>, id: Option<String>, attributes: Attributes) -> Self {
        Self {
            model_name: model_name.into(),
            id,
            attributes,
            state: RecordState::New,
        }
    }

    /// Create a record in the `Loaded` state
    pub fn loaded(model_name: impl Into<String>, id: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            model_name: model_name.into(),
            id: Some(id.into()),
            attributes,
            state: RecordState::Loaded,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Get the id, failing when the record has none
    ///
    /// # Errors
    ///
    /// Returns `MissingRecordId` if the record was never assigned an id.
    pub fn require_id(&self) -> Result<&str> {
        self.id().ok_or_else(|| {
            DualStoreError::MissingRecordId {
                model_name: self.model_name.clone(),
            }
            .into()
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn is_deleted(&self) -> bool {
        self.state == RecordState::Deleted
    }

    /// Equality filter used by local adapters
    ///
    /// Every non-control entry of `query` must equal the attribute of the
    /// same name. The `id` key is compared against the record id.
    pub fn matches(&self, query: &Options) -> bool {
        query
            .iter()
            .filter(|(key, _)| !Options::is_control_key(key))
            .all(|(key, expected)| {
                if key == "id" {
                    return self.id().map(Value::from).as_ref() == Some(expected);
                }
                self.attributes.get(key) == Some(expected)
            })
    }

    /// Parse a `{"type", "id", "attributes"}` resource object
    ///
    /// # Errors
    ///
    /// Returns `InvalidDocument` if `type` or `id` is missing or not a string,
    /// or if `attributes` is present but not an object.
    pub fn from_resource(resource: &Value) -> Result<Self> {
        let invalid = |reason: &str| DualStoreError::InvalidDocument {
            reason: reason.to_string(),
        };

        let object = resource
            .as_object()
            .ok_or_else(|| invalid("resource must be an object"))?;
        let model_name = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("resource.type must be a string"))?;
        // Numeric ids are accepted and kept as strings
        let id = match object.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(invalid("resource.id must be a string or number").into()),
        };
        let attributes = match object.get("attributes") {
            None | Some(Value::Null) => Attributes::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => return Err(invalid("resource.attributes must be an object").into()),
        };

        Ok(Self::loaded(model_name, id, attributes))
    }

    /// Render as a resource object
    pub fn to_resource(&self) -> Value {
        json!({
            "type": self.model_name,
            "id": self.id,
            "attributes": self.attributes,
        })
    }
}

/// A handle to a record by type and id, with the value peeked when it was taken
#[derive(Debug, Clone, PartialEq)]
pub struct RecordReference {
    pub model_name: String,
    pub id: String,
    pub value: Option<Record>,
}

impl RecordReference {
    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }
}
