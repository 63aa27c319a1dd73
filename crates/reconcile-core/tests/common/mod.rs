use reconcile_core::kinds::{local_db_index, match_criteria};
use reconcile_core::{AttributeRecord, AttributeValue, ObjectKind};

/// The built-in `match-criteria` kind
#[allow(dead_code)]
pub fn criteria_kind() -> ObjectKind {
    match_criteria::kind()
}

/// The built-in `local-db-index` kind
#[allow(dead_code)]
pub fn index_kind() -> ObjectKind {
    local_db_index::kind()
}

/// A `match-criteria` record of the given variant with extra attributes
#[allow(dead_code)]
pub fn criteria(variant: &str, attrs: &[(&str, AttributeValue)]) -> AttributeRecord {
    attrs.iter().fold(
        AttributeRecord::new().with("type", AttributeValue::scalar(variant)),
        |record, (name, value)| record.with(*name, value.clone()),
    )
}

/// Build a record from name/value pairs
#[allow(dead_code)]
pub fn record(attrs: &[(&str, AttributeValue)]) -> AttributeRecord {
    attrs
        .iter()
        .map(|(name, value)| (*name, value.clone()))
        .collect()
}
