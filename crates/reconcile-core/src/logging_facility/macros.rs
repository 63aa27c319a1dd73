//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use reconcile_core::log_op_start;
/// log_op_start!("reconcile");
/// log_op_start!("reconcile", object = "match-criteria/c1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use reconcile_core::log_op_end;
/// log_op_end!("reconcile", duration_ms = 42);
/// log_op_end!("reconcile", duration_ms = 42, op_count = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error is converted to [`ExError`](crate::errors::ExError) so the event
/// carries the canonical kind and code.
///
/// # Example
///
/// ```
/// # use reconcile_core::{log_op_error, errors::ReconcileError};
/// let err = ReconcileError::ObjectNotFound { object: "match-criteria/c1".to_string() };
/// log_op_error!("reconcile", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
