//! Plan normalization
//!
//! Normalization turns a user's desired record into the record the driver
//! diffs: the variant is resolved (failing fast), variant defaults fill
//! absent attributes, and every attribute outside the variant is forced to
//! its null representation. The result is a fixed point:
//! `normalize(normalize(D)) == normalize(D)`.

use crate::errors::Result;
use crate::record::AttributeRecord;
use crate::schema::ObjectKind;
use crate::variant::VariantDescriptor;

/// A normalized desired record together with the variant it resolved to
#[derive(Debug, Clone)]
pub struct NormalizedPlan<'k> {
    pub record: AttributeRecord,
    pub variant: &'k VariantDescriptor,
}

/// Normalize a desired record
///
/// # Errors
///
/// - `UnknownAttribute` / `AttributeKindMismatch` if the record does not fit the kind
/// - `MissingDiscriminator` / `UnresolvableVariant` if no variant can be selected
pub fn normalize(kind: &ObjectKind, desired: &AttributeRecord) -> Result<AttributeRecord> {
    normalize_plan(kind, desired).map(|plan| plan.record)
}

/// Normalize a desired record and report the resolved variant
///
/// # Errors
///
/// See [`normalize`].
pub fn normalize_plan<'k>(
    kind: &'k ObjectKind,
    desired: &AttributeRecord,
) -> Result<NormalizedPlan<'k>> {
    kind.validate_record(desired)?;
    let variant = kind.variant_of(desired)?;

    let mut record: AttributeRecord = desired
        .iter()
        .filter(|(_, value)| !value.is_absent())
        .map(|(name, value)| (name, value.clone()))
        .collect();

    for (name, value) in kind.defaults_for(variant).iter() {
        if record.is_absent(name) {
            record = record.with(name, value.clone());
        }
    }

    for (name, value) in kind.not_applicable(variant).iter() {
        record = record.with(name, value.clone());
    }

    tracing::debug!(
        kind = kind.name(),
        variant = variant.name(),
        attributes = record.len(),
        "normalized desired record"
    );
    Ok(NormalizedPlan { record, variant })
}
