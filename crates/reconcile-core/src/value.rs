//! Attribute value model
//!
//! An attribute is either not configured (`Absent`), not yet known
//! (`Unknown`), explicitly cleared (`Null`) or `Present`. Scalars and sets are
//! kept as distinct types so no code path can silently treat one as the other.
//!
//! Two notions of equality exist:
//!
//! - the derived `PartialEq` is structural identity (`Absent == Absent`), used
//!   when checking that normalization reached a fixed point;
//! - [`ScalarValue::equivalent`] / [`SetValue::equivalent`] is what the remote
//!   system considers "the same", and is what the diff engine uses. Absent and
//!   unknown values are never equivalent to anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A value in one of the four attribute states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Value<T> {
    /// Not configured by the user
    Absent,
    /// Will be computed; not yet resolved
    Unknown,
    /// Explicitly cleared
    Null,
    Present(T),
}

/// A string attribute value
pub type ScalarValue = Value<String>;

/// A string-set attribute value. `BTreeSet` makes sets order-insensitive and
/// collapses duplicates.
pub type SetValue = Value<BTreeSet<String>>;

impl<T> Value<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Neither absent nor unknown: the value can take part in a diff
    pub fn is_known(&self) -> bool {
        !self.is_absent() && !self.is_unknown()
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Value::Present(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Absent
    }
}

impl ScalarValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Value::Present(value.into())
    }

    /// Null or the empty string
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Present(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Remote-level equality
    ///
    /// With `empty_means_null`, `Null` and `Present("")` are the same value.
    /// Absent and unknown are never equivalent to anything, themselves included.
    pub fn equivalent(&self, other: &ScalarValue, empty_means_null: bool) -> bool {
        if !self.is_known() || !other.is_known() {
            return false;
        }
        match (self, other) {
            (Value::Present(a), Value::Present(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Null, Value::Present(s)) | (Value::Present(s), Value::Null) => {
                empty_means_null && s.is_empty()
            }
            _ => false,
        }
    }

    /// Render a remote "no value" answer for persistence
    ///
    /// The remote system cannot tell `""` from null. When it reports no value
    /// the result is `""` if the desired value was itself `""`, and null
    /// otherwise, so the persisted state matches what the user wrote.
    pub fn render_remote(desired: &ScalarValue, remote: Option<&str>) -> ScalarValue {
        match remote {
            Some(v) if !v.is_empty() => Value::Present(v.to_string()),
            _ => match desired {
                Value::Present(s) if s.is_empty() => Value::Present(String::new()),
                _ => Value::Null,
            },
        }
    }
}

impl SetValue {
    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Present(values.into_iter().map(Into::into).collect())
    }

    pub fn empty_set() -> Self {
        Value::Present(BTreeSet::new())
    }

    /// Null or a set with no elements
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Present(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Remote-level equality: element order and duplicates are irrelevant and
    /// null is the empty set. Absent and unknown are never equivalent.
    pub fn equivalent(&self, other: &SetValue) -> bool {
        if !self.is_known() || !other.is_known() {
            return false;
        }
        self.elements() == other.elements()
    }

    /// Elements of a known value; null and absent read as empty
    pub fn elements(&self) -> BTreeSet<&str> {
        match self {
            Value::Present(s) => s.iter().map(String::as_str).collect(),
            _ => BTreeSet::new(),
        }
    }
}

/// The value of one attribute, scalar or set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Scalar(ScalarValue),
    Set(SetValue),
}

impl AttributeValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        AttributeValue::Scalar(ScalarValue::scalar(value))
    }

    pub fn set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::Set(SetValue::set(values))
    }

    pub fn null_scalar() -> Self {
        AttributeValue::Scalar(Value::Null)
    }

    pub fn empty_set() -> Self {
        AttributeValue::Set(SetValue::empty_set())
    }

    pub fn unknown_scalar() -> Self {
        AttributeValue::Scalar(Value::Unknown)
    }

    pub fn is_absent(&self) -> bool {
        match self {
            AttributeValue::Scalar(v) => v.is_absent(),
            AttributeValue::Set(v) => v.is_absent(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        match self {
            AttributeValue::Scalar(v) => v.is_unknown(),
            AttributeValue::Set(v) => v.is_unknown(),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            AttributeValue::Scalar(v) => v.is_null(),
            AttributeValue::Set(v) => v.is_null(),
        }
    }

    pub fn is_known(&self) -> bool {
        !self.is_absent() && !self.is_unknown()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Scalar(v) => v.is_empty(),
            AttributeValue::Set(v) => v.is_empty(),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            AttributeValue::Scalar(v) => Some(v),
            AttributeValue::Set(_) => None,
        }
    }

    pub fn as_set(&self) -> Option<&SetValue> {
        match self {
            AttributeValue::Set(v) => Some(v),
            AttributeValue::Scalar(_) => None,
        }
    }
}
