#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{criteria, criteria_kind, index_kind, record};
use reconcile_core::{
    apply_operations, diff, normalize_plan, AttributeValue, Operation, ReconcileError,
};

#[test]
fn test_failed_batch_leaves_record_untouched() {
    // GIVEN an index record and a batch whose last operation is invalid
    let kind = index_kind();
    let current = record(&[("indexType", AttributeValue::set(["equality"]))]);
    let ops = vec![
        Operation::add("indexType", ["substring"]),
        Operation::replace("indexType", Some("ordering".into())),
    ];

    // WHEN applying
    let result = apply_operations(&kind, &current, &ops);

    // THEN the batch is rejected as a whole
    assert!(matches!(
        result,
        Err(ReconcileError::AttributeKindMismatch { .. })
    ));
    assert_eq!(
        current.get("indexType"),
        Some(&AttributeValue::set(["equality"]))
    );
}

#[test]
fn test_diff_applied_reaches_desired_state() {
    // GIVEN a bind-result criteria with remote drift
    let kind = criteria_kind();
    let desired = criteria(
        "bind-result",
        &[
            ("includedUserBaseDN", AttributeValue::set(["ou=people,dc=example,dc=com"])),
            ("description", AttributeValue::scalar("people binds")),
        ],
    );
    let current = criteria(
        "bind-result",
        &[
            ("includedUserBaseDN", AttributeValue::set(["ou=admins,dc=example,dc=com"])),
            ("includeAnonymousBinds", AttributeValue::scalar("false")),
        ],
    );

    // WHEN the diff is applied
    let plan = normalize_plan(&kind, &desired).unwrap();
    let scope = kind.applicable_attributes(plan.variant);
    let ops = diff(&kind, &plan.record, &current, &scope);
    let next = apply_operations(&kind, &current, &ops).unwrap();

    // THEN the default and the explicit values are in place
    assert_eq!(
        next.get("includeAnonymousBinds"),
        Some(&AttributeValue::scalar("true"))
    );
    assert_eq!(
        next.get("includedUserBaseDN"),
        Some(&AttributeValue::set(["ou=people,dc=example,dc=com"]))
    );
    assert!(diff(&kind, &plan.record, &next, &scope).is_empty());
}
