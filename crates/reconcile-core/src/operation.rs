//! Attribute-level change operations
//!
//! The closed set of changes the remote system accepts. A batch of operations
//! is ordered; the diff engine emits it in attribute declaration order and,
//! within one set attribute, additions before removals.

use crate::schema::ObjectKind;
use reconcile_core_types::sensitive::Masked;
use reconcile_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One minimal change to one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Replace a scalar; `None` clears it
    ReplaceScalar {
        attribute: String,
        value: Option<String>,
    },
    AddToSet {
        attribute: String,
        values: BTreeSet<String>,
    },
    RemoveFromSet {
        attribute: String,
        values: BTreeSet<String>,
    },
}

impl Operation {
    pub fn replace(attribute: impl Into<String>, value: Option<String>) -> Self {
        Operation::ReplaceScalar {
            attribute: attribute.into(),
            value,
        }
    }

    pub fn add<I, S>(attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Operation::AddToSet {
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remove<I, S>(attribute: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Operation::RemoveFromSet {
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Remote attribute key the operation targets
    pub fn attribute(&self) -> &str {
        match self {
            Operation::ReplaceScalar { attribute, .. }
            | Operation::AddToSet { attribute, .. }
            | Operation::RemoveFromSet { attribute, .. } => attribute,
        }
    }

    /// Short verb used in rendered plans and logs
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::ReplaceScalar { .. } => "replace",
            Operation::AddToSet { .. } => "add",
            Operation::RemoveFromSet { .. } => "remove",
        }
    }

    /// Display form that hides payloads of attributes `kind` declares sensitive
    pub fn display_for<'a>(&'a self, kind: &ObjectKind) -> OperationDisplay<'a> {
        let redact = kind
            .attribute(self.attribute())
            .is_some_and(|decl| decl.sensitive);
        OperationDisplay { op: self, redact }
    }

    /// Copy of the operation with sensitive payloads replaced by a placeholder,
    /// for serialized plan output
    pub fn redacted(&self, kind: &ObjectKind) -> Operation {
        let sensitive = kind
            .attribute(self.attribute())
            .is_some_and(|decl| decl.sensitive);
        if !sensitive {
            return self.clone();
        }
        let mask = |v: &String| Sensitive::new(v).to_string();
        match self {
            Operation::ReplaceScalar { attribute, value } => Operation::ReplaceScalar {
                attribute: attribute.clone(),
                value: value.as_ref().map(mask),
            },
            Operation::AddToSet { attribute, values } => Operation::AddToSet {
                attribute: attribute.clone(),
                values: values.iter().map(mask).collect(),
            },
            Operation::RemoveFromSet { attribute, values } => Operation::RemoveFromSet {
                attribute: attribute.clone(),
                values: values.iter().map(mask).collect(),
            },
        }
    }
}

/// See [`Operation::display_for`]
pub struct OperationDisplay<'a> {
    op: &'a Operation,
    redact: bool,
}

impl fmt::Display for OperationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Operation::ReplaceScalar {
                attribute,
                value: Some(value),
            } => write!(
                f,
                "replace {} = {:?}",
                attribute,
                Masked::new(value.as_str(), self.redact)
            ),
            Operation::ReplaceScalar {
                attribute,
                value: None,
            } => write!(f, "replace {} = null", attribute),
            Operation::AddToSet { attribute, values }
            | Operation::RemoveFromSet { attribute, values } => write!(
                f,
                "{} {} {:?}",
                self.op.verb(),
                attribute,
                Masked::new(values, self.redact)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeDecl;
    use reconcile_core_types::sensitive::REDACTED;

    fn kind() -> ObjectKind {
        ObjectKind::builder("extension")
            .attribute(AttributeDecl::scalar("class"))
            .attribute(AttributeDecl::set("arguments").sensitive())
            .build()
    }

    #[test]
    fn test_display_plain_operations() {
        let kind = kind();
        assert_eq!(
            Operation::replace("class", Some("com.example.X".into()))
                .display_for(&kind)
                .to_string(),
            "replace class = \"com.example.X\""
        );
        assert_eq!(
            Operation::replace("class", None).display_for(&kind).to_string(),
            "replace class = null"
        );
    }

    #[test]
    fn test_display_redacts_sensitive_attribute() {
        let kind = kind();
        let op = Operation::add("arguments", ["password=hunter2"]);
        let shown = op.display_for(&kind).to_string();
        assert_eq!(shown, format!("add arguments {}", REDACTED));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_redacted_copy_keeps_shape() {
        let kind = kind();
        let op = Operation::remove("arguments", ["a=1", "b=2"]);
        let Operation::RemoveFromSet { values, .. } = op.redacted(&kind) else {
            panic!("shape changed");
        };
        assert_eq!(values.len(), 1);
        assert!(values.contains(REDACTED));

        let plain = Operation::replace("class", Some("x".into()));
        assert_eq!(plain.redacted(&kind), plain);
    }

    #[test]
    fn test_serialized_form_is_tagged() {
        let op = Operation::add("anyIncluded", ["a"]);
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"op": "add_to_set", "attribute": "anyIncluded", "values": ["a"]})
        );
    }
}
