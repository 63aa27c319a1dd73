use reconcile_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using ReconcileError
pub type Result<T> = std::result::Result<T, ReconcileError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error raised by the engine or by a remote collaborator is classified
/// by one of these kinds. Each kind maps to a stable code that callers can
/// match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Variant / schema
    UnresolvableVariant,
    MissingDiscriminator,
    UnknownAttribute,
    AttributeKindMismatch,
    InvalidInput,

    // Remote object state
    NotFound,
    Unmanaged,
    AlreadyExists,
    Conflict,

    // Collaborators
    RemoteRead,
    RemoteWrite,
    PartialApply,
    ExternalService,
    Timeout,
    Cancelled,

    // Auth (reported by collaborators only)
    Unauthorised,
    Forbidden,

    // Programming errors
    InvariantViolation,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnresolvableVariant => "ERR_UNRESOLVABLE_VARIANT",
            ExErrorKind::MissingDiscriminator => "ERR_MISSING_DISCRIMINATOR",
            ExErrorKind::UnknownAttribute => "ERR_UNKNOWN_ATTRIBUTE",
            ExErrorKind::AttributeKindMismatch => "ERR_ATTRIBUTE_KIND_MISMATCH",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Unmanaged => "ERR_UNMANAGED",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::RemoteRead => "ERR_REMOTE_READ",
            ExErrorKind::RemoteWrite => "ERR_REMOTE_WRITE",
            ExErrorKind::PartialApply => "ERR_PARTIAL_APPLY",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a later reconciliation pass can be expected to succeed
    /// without any change to the desired state
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ExternalService
                | ExErrorKind::Timeout
                | ExErrorKind::Conflict
                | ExErrorKind::PartialApply
        )
    }
}

/// Canonical structured error type
///
/// Remote collaborators report failures with this type; the driver wraps it
/// unchanged as the source of [`ReconcileError::RemoteRead`] or
/// [`ReconcileError::RemoteWrite`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    object: Option<String>,
    attribute: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            object: None,
            attribute: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add object identity context
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Add attribute name context
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add candidate values (the known discriminators for UnresolvableVariant)
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the object identity context, if any
    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    /// Get the attribute context, if any
    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get candidate values, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(object) = &self.object {
            write!(f, " (object: {})", object)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, " (attribute: {})", attribute)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for reconciliation calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    // ===== Variant / schema =====
    /// Discriminator value is not in the kind's closed enumeration
    #[error("Unresolvable variant '{value}' for kind {kind} (known: {})", .known.join(", "))]
    UnresolvableVariant {
        kind: String,
        value: String,
        known: Vec<String>,
    },

    /// Discriminator attribute is absent, null or unknown
    #[error("Kind {kind} requires a value for discriminator '{attribute}'")]
    MissingDiscriminator { kind: String, attribute: String },

    /// Record carries an attribute the kind does not declare
    #[error("Attribute '{attribute}' is not declared by kind {kind}")]
    UnknownAttribute { kind: String, attribute: String },

    /// Record value shape contradicts the attribute declaration
    #[error("Attribute '{attribute}' of kind {kind} must be a {expected} value")]
    AttributeKindMismatch {
        kind: String,
        attribute: String,
        expected: String,
    },

    /// Record could not be decoded
    #[error("Invalid record: {reason}")]
    InvalidRecord { reason: String },

    // ===== Remote =====
    /// The remote object does not exist and creation is not this engine's job
    #[error("Object not found: {object}")]
    ObjectNotFound { object: String },

    /// The remote object exists but the caller holds no local state for it
    #[error("Object {object} has no local state; reconcile in adopt mode to take it over")]
    Unmanaged { object: String },

    /// Remote reader failed
    #[error("Failed to read {object}: {source}")]
    RemoteRead {
        object: String,
        #[source]
        source: ExError,
    },

    /// Remote writer failed, possibly after applying part of the batch
    #[error("Failed to apply {operation_count} operation(s) to {object}: {source}")]
    RemoteWrite {
        object: String,
        operation_count: usize,
        #[source]
        source: ExError,
    },

    /// Caller cancelled the call or its deadline passed
    #[error("Reconciliation of {object} cancelled before {stage}")]
    Cancelled { object: String, stage: String },

    // ===== Programming errors =====
    /// A variant descriptor breaks its own invariants
    #[error("Invariant violation in kind {kind}: {reason}")]
    InvariantViolation { kind: String, reason: String },

    // ===== Generic =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ReconcileError {
    /// Canonical kind for this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            ReconcileError::UnresolvableVariant { .. } => ExErrorKind::UnresolvableVariant,
            ReconcileError::MissingDiscriminator { .. } => ExErrorKind::MissingDiscriminator,
            ReconcileError::UnknownAttribute { .. } => ExErrorKind::UnknownAttribute,
            ReconcileError::AttributeKindMismatch { .. } => ExErrorKind::AttributeKindMismatch,
            ReconcileError::InvalidRecord { .. } => ExErrorKind::InvalidInput,
            ReconcileError::ObjectNotFound { .. } => ExErrorKind::NotFound,
            ReconcileError::Unmanaged { .. } => ExErrorKind::Unmanaged,
            ReconcileError::RemoteRead { .. } => ExErrorKind::RemoteRead,
            ReconcileError::RemoteWrite { .. } => ExErrorKind::RemoteWrite,
            ReconcileError::Cancelled { .. } => ExErrorKind::Cancelled,
            ReconcileError::InvariantViolation { .. } => ExErrorKind::InvariantViolation,
            ReconcileError::Serialization { .. } => ExErrorKind::Serialization,
        }
    }
}

/// Conversion from ReconcileError to ExError
///
/// Callers that report errors across a process boundary (CLI exit output,
/// structured logs) use the canonical form.
impl From<ReconcileError> for ExError {
    fn from(err: ReconcileError) -> Self {
        let kind = err.kind();
        match err {
            ReconcileError::UnresolvableVariant { kind: k, value, known } => ExError::new(kind)
                .with_op("resolve_variant")
                .with_message(format!("Unknown {} variant '{}'", k, value))
                .with_candidates(known),

            ReconcileError::MissingDiscriminator { kind: k, attribute } => ExError::new(kind)
                .with_op("resolve_variant")
                .with_attribute(attribute)
                .with_message(format!("Discriminator missing for kind {}", k)),

            ReconcileError::UnknownAttribute { kind: k, attribute } => ExError::new(kind)
                .with_op("validate_record")
                .with_attribute(attribute)
                .with_message(format!("Not declared by kind {}", k)),

            ReconcileError::AttributeKindMismatch {
                kind: k,
                attribute,
                expected,
            } => ExError::new(kind)
                .with_op("validate_record")
                .with_attribute(attribute)
                .with_message(format!("Kind {} expects a {} value", k, expected)),

            ReconcileError::InvalidRecord { reason } => ExError::new(kind)
                .with_op("decode_record")
                .with_message(reason),

            ReconcileError::ObjectNotFound { object } => ExError::new(kind)
                .with_op("fetch")
                .with_object(object)
                .with_message("Remote object does not exist"),

            ReconcileError::Unmanaged { object } => ExError::new(kind)
                .with_op("fetch")
                .with_object(object)
                .with_message("Remote object exists without local state"),

            ReconcileError::RemoteRead { object, source } => ExError::new(kind)
                .with_op("fetch")
                .with_object(object)
                .with_message(source.to_string())
                .with_source(source),

            ReconcileError::RemoteWrite {
                object,
                operation_count,
                source,
            } => ExError::new(kind)
                .with_op("apply")
                .with_object(object)
                .with_message(format!(
                    "Batch of {} operation(s) failed: {}",
                    operation_count, source
                ))
                .with_source(source),

            ReconcileError::Cancelled { object, stage } => ExError::new(kind)
                .with_op(stage)
                .with_object(object)
                .with_message("Cancelled by caller"),

            ReconcileError::InvariantViolation { kind: k, reason } => ExError::new(kind)
                .with_op("check_invariants")
                .with_message(format!("{}: {}", k, reason)),

            ReconcileError::Serialization { message } => ExError::new(kind).with_message(message),
        }
    }
}

/// Conversion from serde_json::Error to ReconcileError
impl From<serde_json::Error> for ReconcileError {
    fn from(err: serde_json::Error) -> Self {
        ReconcileError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::UnresolvableVariant, "ERR_UNRESOLVABLE_VARIANT"),
            (ExErrorKind::MissingDiscriminator, "ERR_MISSING_DISCRIMINATOR"),
            (ExErrorKind::RemoteRead, "ERR_REMOTE_READ"),
            (ExErrorKind::RemoteWrite, "ERR_REMOTE_WRITE"),
            (ExErrorKind::Cancelled, "ERR_CANCELLED"),
            (ExErrorKind::Unmanaged, "ERR_UNMANAGED"),
            (ExErrorKind::InvariantViolation, "ERR_INVARIANT_VIOLATION"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_unresolvable_variant_carries_candidates() {
        let err = ReconcileError::UnresolvableVariant {
            kind: "match-criteria".into(),
            value: "fuzzy".into(),
            known: vec!["aggregate".into(), "third-party".into()],
        };
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::UnresolvableVariant);
        assert_eq!(
            ex.candidates(),
            Some(&["aggregate".to_string(), "third-party".to_string()][..])
        );
    }

    #[test]
    fn test_remote_write_keeps_collaborator_error_as_source() {
        let remote = ExError::new(ExErrorKind::Timeout).with_message("gateway timeout");
        let err = ReconcileError::RemoteWrite {
            object: "match-criteria/c1".into(),
            operation_count: 2,
            source: remote.clone(),
        };
        assert_eq!(
            std::error::Error::source(&err).map(|s| s.to_string()),
            Some(remote.to_string())
        );

        let ex: ExError = err.into();
        assert_eq!(ex.code(), "ERR_REMOTE_WRITE");
        assert_eq!(ex.source_error(), Some(&remote));
    }

    #[test]
    fn test_display_includes_code_message_and_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("fetch")
            .with_object("local-db-index/userRoot/uid")
            .with_message("Remote object does not exist");
        assert_eq!(
            err.to_string(),
            "[ERR_NOT_FOUND] in operation 'fetch': Remote object does not exist (object: local-db-index/userRoot/uid)"
        );
    }

    #[test]
    fn test_transient_kinds() {
        assert!(ExErrorKind::Timeout.is_transient());
        assert!(ExErrorKind::PartialApply.is_transient());
        assert!(!ExErrorKind::UnresolvableVariant.is_transient());
        assert!(!ExErrorKind::Forbidden.is_transient());
    }
}
