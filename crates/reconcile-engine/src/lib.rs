//! Reconcile Engine - Orchestration layer
//!
//! Drives one reconciliation call: resolve the variant, fetch the remote
//! object, normalize, diff, apply and report. The remote is reached only
//! through the [`RemoteReader`] and [`RemoteWriter`] collaborators injected
//! into [`Reconciler::new`].

pub mod commands;
pub mod memory;
pub mod remote;

pub use commands::reconcile::{
    ChangeStatus, ReconcileMode, ReconcileOptions, ReconcileOutcome, ReconcileState, Reconciler,
};
pub use memory::InMemoryRemote;
pub use remote::{RemoteReader, RemoteWriter};
