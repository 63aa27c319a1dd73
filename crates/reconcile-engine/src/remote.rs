//! Remote collaborator contracts
//!
//! The driver never talks to the remote system directly. Transport,
//! authentication and retries live behind these two traits; errors come back
//! as the canonical [`ExError`] and are surfaced to the caller unchanged.

use reconcile_core::core_types::RequestContext;
use reconcile_core::{AttributeRecord, ExError, ObjectIdentity, Operation};

/// Reads the current state of one remote object
pub trait RemoteReader {
    /// Current attributes of `identity`
    ///
    /// `Ok(None)` means the object does not exist; `Ok(Some(empty))` means it
    /// exists with no attributes set.
    ///
    /// # Errors
    ///
    /// Any transport or remote failure, classified by `ExErrorKind`.
    fn fetch(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
    ) -> Result<Option<AttributeRecord>, ExError>;
}

/// Applies an ordered batch of operations to one remote object
pub trait RemoteWriter {
    /// Apply `ops` atomically and in order
    ///
    /// Returns the post-apply state when the remote reports it, or `None`
    /// when the caller has to re-fetch.
    ///
    /// # Errors
    ///
    /// Any transport or remote failure. A failure after part of the batch was
    /// applied is reported with `ExErrorKind::PartialApply`.
    fn apply(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
        ops: &[Operation],
    ) -> Result<Option<AttributeRecord>, ExError>;
}
