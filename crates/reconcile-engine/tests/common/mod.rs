use reconcile_core::core_types::RequestContext;
use reconcile_core::{AttributeRecord, AttributeValue, ExError, ObjectIdentity, Operation};
use reconcile_engine::{InMemoryRemote, RemoteReader, RemoteWriter};
use std::sync::Mutex;

/// Wraps an in-memory remote, counting calls and optionally failing them
#[derive(Default)]
pub struct SpyRemote {
    pub inner: InMemoryRemote,
    pub fetches: Mutex<usize>,
    pub writes: Mutex<Vec<Vec<Operation>>>,
    pub fail_fetch: Option<ExError>,
    pub fail_apply: Option<ExError>,
}

#[allow(dead_code)]
impl SpyRemote {
    pub fn new(inner: InMemoryRemote) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn failing_fetch(mut self, err: ExError) -> Self {
        self.fail_fetch = Some(err);
        self
    }

    pub fn failing_apply(mut self, err: ExError) -> Self {
        self.fail_apply = Some(err);
        self
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    pub fn batches(&self) -> Vec<Vec<Operation>> {
        self.writes.lock().unwrap().clone()
    }
}

impl RemoteReader for SpyRemote {
    fn fetch(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
    ) -> Result<Option<AttributeRecord>, ExError> {
        *self.fetches.lock().unwrap() += 1;
        if let Some(err) = &self.fail_fetch {
            return Err(err.clone());
        }
        self.inner.fetch(ctx, identity)
    }
}

impl RemoteWriter for SpyRemote {
    fn apply(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
        ops: &[Operation],
    ) -> Result<Option<AttributeRecord>, ExError> {
        self.writes.lock().unwrap().push(ops.to_vec());
        if let Some(err) = &self.fail_apply {
            return Err(err.clone());
        }
        self.inner.apply(ctx, identity, ops)
    }
}

/// A `match-criteria` record of the given variant with extra attributes
#[allow(dead_code)]
pub fn criteria(variant: &str, attrs: &[(&str, AttributeValue)]) -> AttributeRecord {
    attrs.iter().fold(
        AttributeRecord::new().with("type", AttributeValue::scalar(variant)),
        |record, (name, value)| record.with(*name, value.clone()),
    )
}

/// Identity of a `match-criteria` object
#[allow(dead_code)]
pub fn criteria_id(name: &str) -> ObjectIdentity {
    ObjectIdentity::new("match-criteria", name)
}
