#![allow(clippy::unwrap_used, clippy::expect_used)]

use reconcile_core::errors::ReconcileError;
use reconcile_core::logging_facility::test_capture::init_test_capture;
use reconcile_core::{log_op_end, log_op_error, log_op_start};
use reconcile_core::core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_CHANGE, FIELD_DURATION_MS, FIELD_ERR_CODE,
    FIELD_ERR_KIND, FIELD_KIND, FIELD_OBJECT, FIELD_OP_COUNT,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    assert_eq!(capture.events_for(op_name, EVENT_START).len(), 1);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events = capture.events_for(op_name, EVENT_END);
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = ReconcileError::ObjectNotFound {
        object: "match-criteria/c1".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events = capture.events_for(op_name, EVENT_END_ERROR);
    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(error_events[0].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(error_events[0].field(FIELD_ERR_KIND), Some("NotFound"));
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, object = "local-db-index/userRoot/uid", kind = "local-db-index");
    log_op_end!(op_name, duration_ms = 1, op_count = 3usize, change = "applied");

    let start = &capture.events_for(op_name, EVENT_START)[0];
    assert_eq!(start.field(FIELD_OBJECT), Some("local-db-index/userRoot/uid"));
    assert_eq!(start.field(FIELD_KIND), Some("local-db-index"));

    let end = &capture.events_for(op_name, EVENT_END)[0];
    assert_eq!(end.field(FIELD_OP_COUNT), Some("3"));
    assert_eq!(end.field(FIELD_CHANGE), Some("applied"));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_capture_count_events() {
    let capture = init_test_capture();
    let op1_name = "test_count_events_op1_unique_5";
    let op2_name = "test_count_events_op2_unique_5";

    log_op_start!(op1_name);
    log_op_start!(op2_name);
    log_op_end!(op1_name, duration_ms = 10);

    let start_count = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_START)
            && (e.op.as_deref() == Some(op1_name) || e.op.as_deref() == Some(op2_name))
    });
    let end_count = capture.count_events(|e| {
        e.event.as_deref() == Some(EVENT_END)
            && (e.op.as_deref() == Some(op1_name) || e.op.as_deref() == Some(op2_name))
    });

    assert_eq!(start_count, 2);
    assert_eq!(end_count, 1);
}
