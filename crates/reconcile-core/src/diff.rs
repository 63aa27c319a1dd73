//! Attribute diff engine
//!
//! The core entry point is [`diff`], which turns a desired and a current
//! record of one object into the ordered, minimal list of operations that
//! converges the remote object. The engine is pure and cannot fail: records
//! are validated against the kind before they get here.

use crate::operation::Operation;
use crate::record::AttributeRecord;
use crate::schema::{AttrKind, AttributeDecl, ObjectKind};
use crate::value::{ScalarValue, SetValue, Value};
use reconcile_core_types::sensitive::Masked;
use std::collections::BTreeSet;

/// Compute the operations that make `current` match `desired`
///
/// Attributes are visited in declaration order and restricted to
/// `applicable`. An attribute left absent or unknown in `desired` is skipped;
/// an absent, unknown or null current value reads as "no value".
pub fn diff(
    kind: &ObjectKind,
    desired: &AttributeRecord,
    current: &AttributeRecord,
    applicable: &BTreeSet<String>,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    for decl in kind
        .attributes()
        .iter()
        .filter(|decl| applicable.contains(&decl.name))
    {
        match decl.kind {
            AttrKind::Scalar => {
                if let Some(op) =
                    diff_scalar(decl, desired.scalar(&decl.name), current.scalar(&decl.name))
                {
                    tracing::debug!(
                        attribute = %decl.name,
                        value = ?Masked::new(&op, decl.sensitive),
                        "scalar differs"
                    );
                    ops.push(op);
                }
            }
            AttrKind::Set => {
                let set_ops = diff_set(decl, desired.set(&decl.name), current.set(&decl.name));
                if !set_ops.is_empty() {
                    tracing::debug!(
                        attribute = %decl.name,
                        op_count = set_ops.len(),
                        "set differs"
                    );
                }
                ops.extend(set_ops);
            }
        }
    }
    ops
}

/// Operation for one scalar attribute, if any
pub fn diff_scalar(
    decl: &AttributeDecl,
    desired: &ScalarValue,
    current: &ScalarValue,
) -> Option<Operation> {
    if !desired.is_known() {
        return None;
    }
    let current = if current.is_known() {
        current.clone()
    } else {
        Value::Null
    };
    if desired.equivalent(&current, decl.empty_means_null) {
        return None;
    }
    let payload = match desired {
        Value::Present(v) => Some(v.clone()),
        _ if decl.empty_means_null => Some(String::new()),
        _ => None,
    };
    Some(Operation::replace(decl.name.clone(), payload))
}

/// Additions then removals for one set attribute
pub fn diff_set(decl: &AttributeDecl, desired: &SetValue, current: &SetValue) -> Vec<Operation> {
    if !desired.is_known() {
        return Vec::new();
    }
    let wanted = desired.elements();
    let have = current.elements();

    let added: BTreeSet<&str> = wanted.difference(&have).copied().collect();
    let removed: BTreeSet<&str> = have.difference(&wanted).copied().collect();

    let mut ops = Vec::new();
    if !added.is_empty() {
        ops.push(Operation::add(decl.name.clone(), added));
    }
    if !removed.is_empty() {
        ops.push(Operation::remove(decl.name.clone(), removed));
    }
    ops
}
