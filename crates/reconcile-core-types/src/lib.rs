//! Core types shared across Reconcile facilities
//!
//! This crate provides foundational types used by the error, logging and
//! reconciliation layers:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext (with cancellation)
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{CancellationFlag, RequestContext, RequestId, TraceId};
pub use sensitive::Sensitive;
