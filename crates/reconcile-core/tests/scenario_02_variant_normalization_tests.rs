#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{criteria, criteria_kind};
use reconcile_core::{
    diff, normalize, normalize_plan, AttributeValue, MatchCriteriaType, Operation,
    ReconcileError,
};
use std::collections::BTreeSet;

#[test]
fn test_variant_exclusivity_and_coverage() {
    // GIVEN the match-criteria kind
    let kind = criteria_kind();
    let mut union = BTreeSet::new();

    // WHEN inspecting every variant
    for variant in kind.variants() {
        let applicable = kind.applicable_attributes(variant);
        let cleared: BTreeSet<String> = kind
            .not_applicable(variant)
            .names()
            .map(str::to_string)
            .collect();

        // THEN applicable and not-applicable never overlap
        assert!(applicable.is_disjoint(&cleared), "{} overlaps", variant.name());
        union.extend(applicable);
    }

    // AND together the variants cover every attribute
    assert_eq!(union, kind.attribute_names());
}

#[test]
fn test_every_type_resolves() {
    let kind = criteria_kind();
    for variant in MatchCriteriaType::ALL {
        assert_eq!(kind.resolve_variant(variant.as_str()).unwrap().name(), variant.as_str());
    }
}

#[test]
fn test_simple_result_defaults_applied() {
    // GIVEN a simple-result criteria without result code criteria
    let kind = criteria_kind();
    let desired = criteria("simple-result", &[]);

    // WHEN normalizing
    let normalized = normalize(&kind, &desired).unwrap();

    // THEN the variant defaults are filled in
    assert_eq!(
        normalized.get("resultCodeCriteria"),
        Some(&AttributeValue::scalar("all-result-codes"))
    );
    assert_eq!(
        normalized.get("processingTimeCriteria"),
        Some(&AttributeValue::scalar("any"))
    );
    // AND attributes of other variants are cleared
    assert_eq!(normalized.get("allIncluded"), Some(&AttributeValue::empty_set()));
    assert_eq!(normalized.get("extensionClass"), Some(&AttributeValue::null_scalar()));
}

#[test]
fn test_variant_switch_retracts_old_attributes() {
    // GIVEN a remote third-party criteria and a desired aggregate one
    let kind = criteria_kind();
    let current = criteria(
        "third-party",
        &[
            ("extensionClass", AttributeValue::scalar("com.example.Criteria")),
            ("extensionArgument", AttributeValue::set(["k=v"])),
        ],
    );
    let desired = criteria("aggregate", &[("anyIncluded", AttributeValue::set(["a"]))]);

    // WHEN normalizing and diffing over both variants
    let plan = normalize_plan(&kind, &desired).unwrap();
    let old = kind.variant_of(&current).unwrap();
    let mut scope = kind.applicable_attributes(plan.variant);
    scope.extend(kind.applicable_attributes(old));
    let ops = diff(&kind, &plan.record, &current, &scope);

    // THEN the type switches and the old attributes are cleared
    assert_eq!(
        ops,
        vec![
            Operation::replace("type", Some("aggregate".into())),
            Operation::add("anyIncluded", ["a"]),
            Operation::replace("extensionClass", Some(String::new())),
            Operation::remove("extensionArgument", ["k=v"]),
        ]
    );
}

#[test]
fn test_missing_type_fails_fast() {
    let kind = criteria_kind();
    let desired = reconcile_core::AttributeRecord::new()
        .with("description", AttributeValue::scalar("no type"));

    assert_eq!(
        normalize(&kind, &desired),
        Err(ReconcileError::MissingDiscriminator {
            kind: "match-criteria".into(),
            attribute: "type".into(),
        })
    );
}

#[test]
fn test_attribute_of_other_variant_is_overridden() {
    // GIVEN an aggregate criteria that also sets a bind-result attribute
    let kind = criteria_kind();
    let desired = criteria(
        "aggregate",
        &[("includedUserFilter", AttributeValue::scalar("(uid=*)"))],
    );

    // WHEN normalizing
    let normalized = normalize(&kind, &desired).unwrap();

    // THEN the stray attribute is nulled
    assert_eq!(
        normalized.get("includedUserFilter"),
        Some(&AttributeValue::null_scalar())
    );
}
