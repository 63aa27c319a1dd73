//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent between the driver, the
//! collaborators and the test capture layer.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Object identifiers
pub const FIELD_OBJECT: &str = "object";
pub const FIELD_KIND: &str = "kind";
pub const FIELD_VARIANT: &str = "variant";

// Reconciliation outcome
pub const FIELD_OP_COUNT: &str = "op_count";
pub const FIELD_CHANGE: &str = "change";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
