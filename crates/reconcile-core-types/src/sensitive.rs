//! Sensitive data marker for automatic redaction
//!
//! Attribute values declared sensitive (bind passwords, extension secrets)
//! pass through `Sensitive<T>` before they reach a log line, a plan rendering
//! or a serialized report.

use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder written in place of a redacted value
pub const REDACTED: &str = "***REDACTED***";

/// Wrapper for sensitive data that redacts itself in Debug, Display and Serialize
///
/// # Example
///
/// ```
/// use reconcile_core_types::Sensitive;
///
/// let password = Sensitive::new("secret123");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.to_string(), "***REDACTED***");
///
/// // Access the actual value when needed
/// assert_eq!(password.expose(), &"secret123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    /// Wrap a sensitive value
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying sensitive value
    ///
    /// Only the remote writer should need this.
    pub fn expose(&self) -> &T {
        &self.0
    }

    /// Consume the wrapper and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

/// Borrowed view that redacts only when asked to
///
/// Used where redaction is decided per attribute at runtime.
pub struct Masked<'a, T: ?Sized> {
    value: &'a T,
    redact: bool,
}

impl<'a, T: ?Sized> Masked<'a, T> {
    pub fn new(value: &'a T, redact: bool) -> Self {
        Self { value, redact }
    }
}

impl<T: fmt::Display + ?Sized> fmt::Display for Masked<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.redact {
            f.write_str(REDACTED)
        } else {
            self.value.fmt(f)
        }
    }
}

impl<T: fmt::Debug + ?Sized> fmt::Debug for Masked<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.redact {
            f.write_str(REDACTED)
        } else {
            self.value.fmt(f)
        }
    }
}
