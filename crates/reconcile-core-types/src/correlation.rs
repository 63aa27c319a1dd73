//! Correlation and cancellation types
//!
//! A [`RequestContext`] is created by the caller for each reconciliation call
//! and handed through the driver to every collaborator call. It carries the
//! correlation ids used in log lines and the caller's cancellation signal.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Unique identifier for a single reconciliation call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace identifier shared by every call made on behalf of one caller run
/// (for example one `apply` over many objects)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new random TraceId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared cancellation signal
///
/// Cloning shares the flag, so a caller can keep one clone and cancel every
/// context built from it.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Context carried through operation boundaries for correlation and cancellation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
    cancellation: CancellationFlag,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            trace_id: None,
            cancellation: CancellationFlag::new(),
            deadline: None,
        }
    }

    /// Create a context with an existing RequestId
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            ..Self::new()
        }
    }

    /// Add a TraceId to the context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Attach a caller-owned cancellation flag
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = flag;
        self
    }

    /// Give up once `timeout` has elapsed from now
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, if one is set
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// True once cancelled or past the deadline
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_str().is_empty());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::from_string("req-1".to_string());
        assert_eq!(format!("{}", id), "req-1");
    }

    #[test]
    fn test_request_context_with_trace_id() {
        let trace_id = TraceId::new();
        let ctx = RequestContext::new().with_trace_id(trace_id.clone());
        assert_eq!(ctx.trace_id, Some(trace_id));
    }

    #[test]
    fn test_cancellation_is_shared_between_clones() {
        let flag = CancellationFlag::new();
        let ctx = RequestContext::new().with_cancellation(flag.clone());
        let copy = ctx.clone();

        assert!(!ctx.is_cancelled());
        flag.cancel();
        assert!(ctx.is_cancelled());
        assert!(copy.is_cancelled());
    }

    #[test]
    fn test_elapsed_deadline_counts_as_cancelled() {
        let ctx = RequestContext::new().with_timeout(Duration::ZERO);
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_no_deadline_by_default() {
        let ctx = RequestContext::default();
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn test_serialization() {
        let id = RequestId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
