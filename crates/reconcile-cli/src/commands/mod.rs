pub mod kinds;
pub mod reconcile;
