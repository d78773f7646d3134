//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names stable across the router, the
//! repositories and the synchronization layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Routing fields
pub const FIELD_ROUTE: &str = "route";
pub const FIELD_SHAPE: &str = "shape";
pub const FIELD_DECORATED: &str = "decorated";

// Entity identifiers
pub const FIELD_MODEL_NAME: &str = "model_name";
pub const FIELD_RECORD_ID: &str = "record_id";
pub const FIELD_RECORD_COUNT: &str = "record_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ROUTED: &str = "routed";
pub const EVENT_SYNCED: &str = "synced";

// Route labels
pub const ROUTE_REMOTE: &str = "remote";
pub const ROUTE_LOCAL: &str = "local";
