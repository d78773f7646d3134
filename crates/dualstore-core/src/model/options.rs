//! Options-like call arguments
//!
//! Query-shaped operations take a JSON mapping that may carry the per-call
//! routing override under `useOnlineStore`, next to real query parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key carrying the per-call routing override
pub const USE_ONLINE_STORE: &str = "useOnlineStore";
/// Key telling the decoration layer to skip offline bookkeeping
pub const BYPASS: &str = "bypass";
/// Key forcing a fetch even when the record is already loaded
pub const RELOAD: &str = "reload";

/// A mapping argument passed to find/query operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Shorthand for an options mapping carrying only the routing override
    pub fn use_online_store(value: bool) -> Self {
        Self::new().with(USE_ONLINE_STORE, value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Read the routing override without removing it
    pub fn override_flag(&self) -> Option<bool> {
        self.0.get(USE_ONLINE_STORE).and_then(parse_override)
    }

    /// Remove the routing override key and return its interpretation
    ///
    /// The key is removed whatever its value, so it never reaches a query
    /// string or a local filter.
    pub fn take_override_flag(&mut self) -> Option<bool> {
        self.0
            .remove(USE_ONLINE_STORE)
            .and_then(|value| parse_override(&value))
    }

    /// Merge `bypass: true` underneath the existing keys
    ///
    /// An explicit `bypass` already present wins.
    pub fn with_bypass(mut self) -> Self {
        self.0
            .entry(BYPASS.to_string())
            .or_insert(Value::Bool(true));
        self
    }

    pub fn is_bypass(&self) -> bool {
        matches!(self.0.get(BYPASS), Some(Value::Bool(true)))
    }

    pub fn is_reload(&self) -> bool {
        matches!(self.0.get(RELOAD), Some(Value::Bool(true)))
    }

    /// Keys that steer the repositories rather than filter records
    pub fn is_control_key(key: &str) -> bool {
        matches!(key, USE_ONLINE_STORE | BYPASS | RELOAD)
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Interpret a `useOnlineStore` value
///
/// Booleans are taken as-is. Empty values (`null`, `""`, `[]`) mean
/// "no opinion". Any other value is not `true`, so it forces the local
/// repository.
pub fn parse_override(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        _ => Some(false),
    }
}
