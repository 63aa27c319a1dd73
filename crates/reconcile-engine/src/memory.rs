//! In-memory remote
//!
//! Implements both collaborator traits over a map of records. Operations are
//! applied with the same rules the remote system uses, so the driver can be
//! exercised end to end without a network. Used by tests and by the CLI.

use crate::remote::{RemoteReader, RemoteWriter};
use reconcile_core::core_types::RequestContext;
use reconcile_core::{
    apply_operations, AttributeRecord, ExError, ExErrorKind, KindRegistry, ObjectIdentity,
    Operation,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Remote objects held in memory
#[derive(Debug)]
pub struct InMemoryRemote {
    kinds: KindRegistry,
    objects: Mutex<HashMap<ObjectIdentity, AttributeRecord>>,
    echo_state: bool,
}

impl InMemoryRemote {
    /// Empty remote that knows the built-in kinds
    pub fn new() -> Self {
        Self::with_kinds(KindRegistry::builtin())
    }

    pub fn with_kinds(kinds: KindRegistry) -> Self {
        Self {
            kinds,
            objects: Mutex::new(HashMap::new()),
            echo_state: true,
        }
    }

    /// Make `apply` return `None`, forcing the caller to re-fetch
    pub fn without_echo(mut self) -> Self {
        self.echo_state = false;
        self
    }

    /// Store `record` as the state of `identity`
    pub fn insert(&self, identity: ObjectIdentity, record: AttributeRecord) {
        self.objects().insert(identity, record);
    }

    /// Current state of `identity`, if it exists
    pub fn get(&self, identity: &ObjectIdentity) -> Option<AttributeRecord> {
        self.objects().get(identity).cloned()
    }

    // Writes replace whole records; the map stays consistent after a panic.
    fn objects(&self) -> MutexGuard<'_, HashMap<ObjectIdentity, AttributeRecord>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteReader for InMemoryRemote {
    fn fetch(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
    ) -> Result<Option<AttributeRecord>, ExError> {
        let objects = self.objects();
        tracing::debug!(object = %identity, request_id = %ctx.request_id, "in-memory fetch");
        Ok(objects.get(identity).cloned())
    }
}

impl RemoteWriter for InMemoryRemote {
    fn apply(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
        ops: &[Operation],
    ) -> Result<Option<AttributeRecord>, ExError> {
        let kind = self.kinds.get(&identity.kind).ok_or_else(|| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("apply")
                .with_object(identity.to_string())
                .with_message(format!("unknown kind '{}'", identity.kind))
        })?;

        let mut objects = self.objects();
        let current = objects.get(identity).ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound)
                .with_op("apply")
                .with_object(identity.to_string())
                .with_message("object does not exist")
        })?;

        let next = apply_operations(kind, current, ops).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("apply")
                .with_object(identity.to_string())
                .with_request_id(ctx.request_id.clone())
                .with_source(e.into())
        })?;
        tracing::debug!(object = %identity, op_count = ops.len(), "in-memory apply");

        objects.insert(identity.clone(), next.clone());
        Ok(self.echo_state.then_some(next))
    }
}
