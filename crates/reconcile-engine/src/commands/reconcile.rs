//! Reconciliation driver with boundary logging.
//!
//! ## Pipeline (in order):
//! 1. Validate the desired record and resolve its variant (pure, no remote call)
//! 2. Fetching: read the current remote state; a missing object is an error,
//!    and an existing one needs local state unless it is being adopted
//! 3. Normalizing: defaults and not-applicable nulling
//! 4. Diffing: ordered minimal operations over the variant scope
//! 5. dry_run short-circuit (no writes)
//! 6. Applying: one atomic batch, skipped when there is nothing to do
//! 7. Render the post-apply state for persistence
//!
//! ## Logging Ownership
//!
//! The driver owns lifecycle logging for `reconcile`:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (core, collaborators) use only `tracing::debug!()`.

use crate::remote::{RemoteReader, RemoteWriter};
use reconcile_core::core_types::RequestContext;
use reconcile_core::errors::{ReconcileError, Result};
use reconcile_core::{
    apply_operations, diff, log_op_end, log_op_error, log_op_start, normalize_plan,
    AttrKind, AttributeRecord, AttributeValue, ObjectIdentity, ObjectKind, Operation,
    ScalarValue, Value,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// How the driver treats a pre-existing remote object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// The object is already managed; local state is required
    #[default]
    Update,
    /// No local state; the existing remote object becomes the baseline
    Adopt,
}

/// Per-call options
///
/// `prior` is the state the caller persisted after its last successful
/// reconciliation of the object. In [`ReconcileMode::Update`] a call without
/// it fails with `Unmanaged` once the remote object is found.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions<'p> {
    pub mode: ReconcileMode,
    pub prior: Option<&'p AttributeRecord>,
    /// Compute the plan but skip the write
    pub dry_run: bool,
}

impl<'p> ReconcileOptions<'p> {
    /// Converge an object the caller already manages
    pub fn update(prior: &'p AttributeRecord) -> Self {
        Self {
            prior: Some(prior),
            ..Self::default()
        }
    }

    /// Take over an object the caller holds no state for
    pub fn adopt() -> Self {
        Self {
            mode: ReconcileMode::Adopt,
            ..Self::default()
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }
}

/// Driver states, in the order a successful call visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileState {
    Fetching,
    Normalizing,
    Diffing,
    Applying,
    Done,
    Failed,
}

/// What happened to the remote object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// Current state already matched; nothing was written
    NoChange,
    /// Dry run; operations were computed but not written
    Planned,
    /// Operations were written
    Applied,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeStatus::NoChange => "no_change",
            ChangeStatus::Planned => "planned",
            ChangeStatus::Applied => "applied",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one reconciliation call
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub identity: ObjectIdentity,
    /// Variant the desired record resolved to
    pub variant: String,
    pub operations: Vec<Operation>,
    pub status: ChangeStatus,
    /// The remote object was taken over as the baseline
    pub adopted: bool,
    pub transitions: Vec<ReconcileState>,
    /// Post-apply state rendered for persistence; the predicted state for a
    /// dry run
    pub state: AttributeRecord,
}

/// Reconciles desired records against a remote through injected collaborators
pub struct Reconciler<'a> {
    reader: &'a dyn RemoteReader,
    writer: &'a dyn RemoteWriter,
}

impl<'a> Reconciler<'a> {
    pub fn new(reader: &'a dyn RemoteReader, writer: &'a dyn RemoteWriter) -> Self {
        Self { reader, writer }
    }

    /// Converge the remote object `identity` on `desired`
    ///
    /// # Errors
    ///
    /// - `UnknownAttribute`, `AttributeKindMismatch`, `MissingDiscriminator`,
    ///   `UnresolvableVariant`: the desired or fetched record does not fit `kind`
    /// - `InvalidRecord`: `identity` names a different kind than `kind`
    /// - `ObjectNotFound`: the remote object does not exist
    /// - `Unmanaged`: update mode without prior local state
    /// - `RemoteRead`, `RemoteWrite`: a collaborator failed; its error is the source
    /// - `Cancelled`: `ctx` was cancelled or its deadline passed before a remote call
    pub fn reconcile(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
        kind: &ObjectKind,
        desired: &AttributeRecord,
        options: &ReconcileOptions<'_>,
    ) -> Result<ReconcileOutcome> {
        let object = identity.to_string();
        log_op_start!(
            "reconcile",
            object = %object,
            kind = kind.name(),
            request_id = %ctx.request_id,
            dry_run = options.dry_run
        );
        let start = std::time::Instant::now();

        let mut transitions = Vec::new();
        let outcome = self
            .reconcile_impl(ctx, identity, kind, desired, options, &mut transitions)
            .map_err(|e| {
                transitions.push(ReconcileState::Failed);
                tracing::debug!(object = %object, transitions = ?transitions, "reconcile failed");
                log_op_error!(
                    "reconcile",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    object = %object
                );
                e
            })?;

        log_op_end!(
            "reconcile",
            duration_ms = start.elapsed().as_millis() as u64,
            object = %object,
            variant = %outcome.variant,
            op_count = outcome.operations.len(),
            change = outcome.status.as_str(),
            adopted = outcome.adopted
        );
        Ok(outcome)
    }

    fn reconcile_impl(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
        kind: &ObjectKind,
        desired: &AttributeRecord,
        options: &ReconcileOptions<'_>,
        transitions: &mut Vec<ReconcileState>,
    ) -> Result<ReconcileOutcome> {
        // Pre-flight: a mismatched identity or unresolvable variant never
        // reaches the remote
        if identity.kind != kind.name() {
            return Err(ReconcileError::InvalidRecord {
                reason: format!(
                    "identity {} does not belong to kind {}",
                    identity,
                    kind.name()
                ),
            });
        }
        kind.validate_record(desired)?;
        kind.variant_of(desired)?;

        transitions.push(ReconcileState::Fetching);
        let current = self.fetch_existing(ctx, identity, "fetch")?;
        kind.validate_record(&current)?;
        let adopted = match (options.mode, options.prior) {
            (ReconcileMode::Adopt, _) => {
                tracing::debug!(object = %identity, "adopting existing remote object");
                true
            }
            (ReconcileMode::Update, Some(prior)) => {
                kind.validate_record(prior)?;
                false
            }
            (ReconcileMode::Update, None) => {
                return Err(ReconcileError::Unmanaged {
                    object: identity.to_string(),
                })
            }
        };

        transitions.push(ReconcileState::Normalizing);
        let plan = normalize_plan(kind, desired)?;

        transitions.push(ReconcileState::Diffing);
        let scope = diff_scope(kind, plan.variant.name(), &current)?;
        if let Some(prior) = options.prior {
            let drift = diff(kind, prior, &current, &scope).len();
            if drift > 0 {
                tracing::debug!(object = %identity, drift, "remote drifted from local state");
            }
        }
        let operations = diff(kind, &plan.record, &current, &scope);
        tracing::debug!(
            object = %identity,
            op_count = operations.len(),
            "computed operations"
        );

        let (status, post) = if operations.is_empty() {
            (ChangeStatus::NoChange, current)
        } else if options.dry_run {
            (
                ChangeStatus::Planned,
                apply_operations(kind, &current, &operations)?,
            )
        } else {
            transitions.push(ReconcileState::Applying);
            (ChangeStatus::Applied, self.write(ctx, identity, &operations)?)
        };

        transitions.push(ReconcileState::Done);
        Ok(ReconcileOutcome {
            identity: identity.clone(),
            variant: plan.variant.name().to_string(),
            state: render_state(kind, &plan.record, &post),
            operations,
            status,
            adopted,
            transitions: transitions.clone(),
        })
    }

    fn fetch_existing(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
        stage: &str,
    ) -> Result<AttributeRecord> {
        check_cancelled(ctx, identity, stage)?;
        self.reader
            .fetch(ctx, identity)
            .map_err(|source| ReconcileError::RemoteRead {
                object: identity.to_string(),
                source,
            })?
            .ok_or_else(|| ReconcileError::ObjectNotFound {
                object: identity.to_string(),
            })
    }

    fn write(
        &self,
        ctx: &RequestContext,
        identity: &ObjectIdentity,
        operations: &[Operation],
    ) -> Result<AttributeRecord> {
        check_cancelled(ctx, identity, "apply")?;
        let returned = self
            .writer
            .apply(ctx, identity, operations)
            .map_err(|source| ReconcileError::RemoteWrite {
                object: identity.to_string(),
                operation_count: operations.len(),
                source,
            })?;

        match returned {
            Some(post) => Ok(post),
            None => {
                tracing::debug!(object = %identity, "writer returned no state, re-fetching");
                self.fetch_existing(ctx, identity, "refetch")
            }
        }
    }
}

fn check_cancelled(ctx: &RequestContext, identity: &ObjectIdentity, stage: &str) -> Result<()> {
    if ctx.is_cancelled() {
        return Err(ReconcileError::Cancelled {
            object: identity.to_string(),
            stage: stage.to_string(),
        });
    }
    Ok(())
}

/// Attributes the diff may touch
///
/// When the remote object currently has another variant, the old variant's
/// attributes are included so the switch retracts them.
fn diff_scope(
    kind: &ObjectKind,
    desired_variant: &str,
    current: &AttributeRecord,
) -> Result<BTreeSet<String>> {
    let desired = kind.resolve_variant(desired_variant)?;
    let mut scope = kind.applicable_attributes(desired);

    let current_variant = match kind.discriminator() {
        Some(attr) => match current.scalar(attr) {
            Value::Present(value) => Some(kind.resolve_variant(value)?),
            _ => None,
        },
        None => None,
    };
    if let Some(current_variant) = current_variant {
        if current_variant.name() != desired.name() {
            tracing::debug!(
                from = current_variant.name(),
                to = desired.name(),
                "variant switch"
            );
            scope.extend(kind.applicable_attributes(current_variant));
        }
    }
    Ok(scope)
}

/// Render a remote record for persistence
///
/// A remote "no value" on a scalar flagged "empty means null" becomes `""`
/// when the desired value was `""`, and null otherwise. Null sets become
/// empty sets.
fn render_state(
    kind: &ObjectKind,
    desired: &AttributeRecord,
    remote: &AttributeRecord,
) -> AttributeRecord {
    remote
        .iter()
        .map(|(name, value)| {
            let decl = kind.attribute(name);
            let rendered = match (decl.map(|d| (d.kind, d.empty_means_null)), value) {
                (Some((AttrKind::Scalar, true)), AttributeValue::Scalar(v)) if v.is_empty() => {
                    AttributeValue::Scalar(ScalarValue::render_remote(desired.scalar(name), None))
                }
                (Some((AttrKind::Set, _)), AttributeValue::Set(Value::Null)) => {
                    AttributeValue::empty_set()
                }
                _ => value.clone(),
            };
            (name, rendered)
        })
        .collect()
}
