//! Functional-boundary apply function
//!
//! [`apply_operations`] applies an ordered batch of operations to a record the
//! way the remote system does, and returns the new record.
//!
//! ## Atomicity Contract
//!
//! - **All-or-nothing**: the whole batch is validated against the kind before
//!   any operation takes effect; on error the caller's record is untouched
//! - **No panics**: invalid operations return typed errors
//! - **Remote rendering**: a scalar replaced by `""` on an attribute flagged
//!   "empty means null" is stored as null, as the remote would store it
//!
//! ## Example
//!
//! ```
//! use reconcile_core::apply::apply_operations;
//! use reconcile_core::{AttributeDecl, AttributeRecord, AttributeValue, ObjectKind, Operation};
//!
//! let kind = ObjectKind::builder("location")
//!     .attribute(AttributeDecl::scalar("description"))
//!     .build();
//! let record = AttributeRecord::new();
//! let ops = vec![Operation::replace("description", Some("rack 4".into()))];
//!
//! let next = apply_operations(&kind, &record, &ops).unwrap();
//! assert_eq!(next.get("description"), Some(&AttributeValue::scalar("rack 4")));
//! ```

use crate::errors::{ReconcileError, Result};
use crate::operation::Operation;
use crate::record::AttributeRecord;
use crate::schema::{AttrKind, ObjectKind};
use crate::value::{AttributeValue, Value};
use std::collections::BTreeSet;

/// Apply a batch of operations to a record, returning the new record
///
/// # Errors
///
/// - `UnknownAttribute` if an operation targets an attribute the kind does not declare
/// - `AttributeKindMismatch` if a scalar operation targets a set or vice versa
pub fn apply_operations(
    kind: &ObjectKind,
    record: &AttributeRecord,
    ops: &[Operation],
) -> Result<AttributeRecord> {
    for op in ops {
        validate_operation(kind, op)?;
    }

    let mut next = record.clone();
    for op in ops {
        next = apply_one(kind, next, op);
    }
    Ok(next)
}

fn validate_operation(kind: &ObjectKind, op: &Operation) -> Result<()> {
    let decl = kind
        .attribute(op.attribute())
        .ok_or_else(|| ReconcileError::UnknownAttribute {
            kind: kind.name().to_string(),
            attribute: op.attribute().to_string(),
        })?;

    let expected = match op {
        Operation::ReplaceScalar { .. } => AttrKind::Scalar,
        Operation::AddToSet { .. } | Operation::RemoveFromSet { .. } => AttrKind::Set,
    };
    if decl.kind != expected {
        return Err(ReconcileError::AttributeKindMismatch {
            kind: kind.name().to_string(),
            attribute: decl.name.clone(),
            expected: decl.kind.to_string(),
        });
    }
    Ok(())
}

fn apply_one(kind: &ObjectKind, record: AttributeRecord, op: &Operation) -> AttributeRecord {
    match op {
        Operation::ReplaceScalar { attribute, value } => {
            let empty_means_null = kind
                .attribute(attribute)
                .is_some_and(|decl| decl.empty_means_null);
            let stored = match value {
                Some(v) if v.is_empty() && empty_means_null => Value::Null,
                Some(v) => Value::Present(v.clone()),
                None => Value::Null,
            };
            record.with(attribute.clone(), AttributeValue::Scalar(stored))
        }
        Operation::AddToSet { attribute, values } => {
            let mut elements = owned_elements(&record, attribute);
            elements.extend(values.iter().cloned());
            record.with(attribute.clone(), AttributeValue::Set(Value::Present(elements)))
        }
        Operation::RemoveFromSet { attribute, values } => {
            let mut elements = owned_elements(&record, attribute);
            elements.retain(|e| !values.contains(e));
            record.with(attribute.clone(), AttributeValue::Set(Value::Present(elements)))
        }
    }
}

fn owned_elements(record: &AttributeRecord, attribute: &str) -> BTreeSet<String> {
    record
        .set(attribute)
        .elements()
        .into_iter()
        .map(str::to_string)
        .collect()
}
