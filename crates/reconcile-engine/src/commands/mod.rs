//! Command orchestration layer.
//!
//! Coordinates the pure reconciliation core with the remote collaborators.

pub mod reconcile;
