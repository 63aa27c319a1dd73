//! Reconcile Core - declarative configuration reconciliation kernel
//!
//! This crate provides the pure parts of reconciliation:
//! - The attribute value model (absent / unknown / null / present)
//! - Object kind declarations and polymorphic variant resolution
//! - Plan normalization (defaults, not-applicable nulling)
//! - The diff engine producing ordered, minimal operations
//! - Functional application of operations to a record
//! - The error and logging facilities shared with the engine and CLI
//!
//! Nothing here performs I/O; the driver in `reconcile-engine` talks to the
//! remote system through injected collaborators.

pub mod apply;
pub mod codec;
pub mod diff;
pub mod errors;
pub mod kinds;
pub mod logging_facility;
pub mod normalize;
pub mod operation;
pub mod record;
pub mod schema;
pub mod value;
pub mod variant;

pub use reconcile_core_types as core_types;

#[doc(hidden)]
pub use tracing as __tracing;

// Re-export commonly used types
pub use apply::apply_operations;
pub use codec::{record_from_json, record_from_str, record_to_json, record_to_json_redacted};
pub use diff::diff;
pub use errors::{ExError, ExErrorKind, ReconcileError, Result};
pub use kinds::{KindRegistry, MatchCriteriaType};
pub use normalize::{normalize, normalize_plan, NormalizedPlan};
pub use operation::Operation;
pub use record::AttributeRecord;
pub use schema::{AttrKind, AttributeDecl, ObjectIdentity, ObjectKind};
pub use value::{AttributeValue, ScalarValue, SetValue, Value};
pub use variant::VariantDescriptor;
