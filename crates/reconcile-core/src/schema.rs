//! Object kind declarations
//!
//! An [`ObjectKind`] declares the attributes of one kind of configuration
//! object in the order the remote system expects them, and, for polymorphic
//! kinds, the discriminator attribute and the closed list of variants.

use crate::errors::{ReconcileError, Result};
use crate::record::AttributeRecord;
use crate::value::AttributeValue;
use crate::variant::VariantDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Shape of an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrKind {
    Scalar,
    Set,
}

impl AttrKind {
    /// Value used to clear an attribute of this shape: null for scalars, the
    /// empty set for sets
    pub fn null_representation(self) -> AttributeValue {
        match self {
            AttrKind::Scalar => AttributeValue::null_scalar(),
            AttrKind::Set => AttributeValue::empty_set(),
        }
    }

    pub fn matches(self, value: &AttributeValue) -> bool {
        matches!(
            (self, value),
            (AttrKind::Scalar, AttributeValue::Scalar(_)) | (AttrKind::Set, AttributeValue::Set(_))
        )
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrKind::Scalar => write!(f, "scalar"),
            AttrKind::Set => write!(f, "set"),
        }
    }
}

/// Declaration of one attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDecl {
    pub name: String,
    pub kind: AttrKind,
    /// The remote system stores `""` as "no value" for this attribute
    pub empty_means_null: bool,
    /// Values are redacted in logs and rendered plans
    pub sensitive: bool,
}

impl AttributeDecl {
    /// A string attribute; `""` and null are the same remote value
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttrKind::Scalar,
            empty_means_null: true,
            sensitive: false,
        }
    }

    /// A string-set attribute
    pub fn set(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttrKind::Set,
            empty_means_null: true,
            sensitive: false,
        }
    }

    /// Keep `""` distinct from null (the remote stores empty strings)
    pub fn empty_distinct(mut self) -> Self {
        self.empty_means_null = false;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Remote identity of one configuration object
///
/// `parent` is the owning object's key for nested kinds (an index belongs to
/// a backend, for example).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    pub kind: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl ObjectIdentity {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            parent: None,
        }
    }

    pub fn nested(
        kind: impl Into<String>,
        parent: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            parent: Some(parent.into()),
        }
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}/{}/{}", self.kind, parent, self.id),
            None => write!(f, "{}/{}", self.kind, self.id),
        }
    }
}

/// Declared shape of one kind of configuration object
#[derive(Debug, Clone)]
pub struct ObjectKind {
    name: String,
    discriminator: Option<String>,
    attributes: Vec<AttributeDecl>,
    variants: Vec<VariantDescriptor>,
}

impl ObjectKind {
    pub fn builder(name: impl Into<String>) -> ObjectKindBuilder {
        ObjectKindBuilder {
            name: name.into(),
            discriminator: None,
            attributes: Vec::new(),
            variants: Vec::new(),
            defaults: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the discriminator attribute, for polymorphic kinds
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    /// Attribute declarations in declaration order
    pub fn attributes(&self) -> &[AttributeDecl] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDecl> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attribute_names(&self) -> BTreeSet<String> {
        self.attributes.iter().map(|a| a.name.clone()).collect()
    }

    /// Every variant, in declaration order. Kinds without a discriminator have
    /// exactly one implicit variant named after the kind.
    pub fn variants(&self) -> &[VariantDescriptor] {
        &self.variants
    }

    pub fn is_polymorphic(&self) -> bool {
        self.discriminator.is_some()
    }

    /// Check that every entry of `record` is declared with a matching shape
    ///
    /// # Errors
    ///
    /// - `UnknownAttribute` for a name the kind does not declare
    /// - `AttributeKindMismatch` for a scalar given for a set or vice versa
    pub fn validate_record(&self, record: &AttributeRecord) -> Result<()> {
        for (name, value) in record.iter() {
            let decl = self
                .attribute(name)
                .ok_or_else(|| ReconcileError::UnknownAttribute {
                    kind: self.name.clone(),
                    attribute: name.to_string(),
                })?;
            if !decl.kind.matches(value) {
                return Err(ReconcileError::AttributeKindMismatch {
                    kind: self.name.clone(),
                    attribute: name.to_string(),
                    expected: decl.kind.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`ObjectKind`]
#[derive(Debug)]
pub struct ObjectKindBuilder {
    name: String,
    discriminator: Option<String>,
    attributes: Vec<AttributeDecl>,
    variants: Vec<VariantDescriptor>,
    defaults: BTreeMap<String, AttributeValue>,
}

impl ObjectKindBuilder {
    /// Declare the discriminator. It becomes the first declared attribute and
    /// is applicable in every variant.
    pub fn discriminated_by(mut self, attribute: impl Into<String>) -> Self {
        let attribute = attribute.into();
        self.attributes
            .insert(0, AttributeDecl::scalar(attribute.clone()).empty_distinct());
        self.discriminator = Some(attribute);
        self
    }

    pub fn attribute(mut self, decl: AttributeDecl) -> Self {
        self.attributes.push(decl);
        self
    }

    pub fn variant(mut self, variant: VariantDescriptor) -> Self {
        self.variants.push(variant);
        self
    }

    /// Default for an attribute of a kind without a discriminator
    pub fn default_value(mut self, attribute: impl Into<String>, value: AttributeValue) -> Self {
        self.defaults.insert(attribute.into(), value);
        self
    }

    /// Finish the kind
    ///
    /// Defaults given through [`ObjectKindBuilder::default_value`] are only
    /// used by kinds without a discriminator. Descriptor invariants are not checked here; see
    /// [`ObjectKind::check_invariants`].
    pub fn build(self) -> ObjectKind {
        let variants = match &self.discriminator {
            Some(discriminator) => self
                .variants
                .into_iter()
                .map(|v| v.applies_to([discriminator.as_str()]))
                .collect(),
            None => {
                let implicit = self.defaults.into_iter().fold(
                    VariantDescriptor::new(self.name.clone())
                        .applies_to(self.attributes.iter().map(|a| a.name.as_str())),
                    |variant, (name, value)| variant.default_value(name, value),
                );
                vec![implicit]
            }
        };
        ObjectKind {
            name: self.name,
            discriminator: self.discriminator,
            attributes: self.attributes,
            variants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_display() {
        assert_eq!(
            ObjectIdentity::new("match-criteria", "c1").to_string(),
            "match-criteria/c1"
        );
        assert_eq!(
            ObjectIdentity::nested("local-db-index", "userRoot", "uid").to_string(),
            "local-db-index/userRoot/uid"
        );
    }

    #[test]
    fn test_discriminator_is_first_and_applies_everywhere() {
        let kind = ObjectKind::builder("widget")
            .attribute(AttributeDecl::scalar("size"))
            .discriminated_by("type")
            .variant(VariantDescriptor::new("small").applies_to(["size"]))
            .variant(VariantDescriptor::new("none"))
            .build();

        assert_eq!(kind.attributes()[0].name, "type");
        assert!(!kind.attributes()[0].empty_means_null);
        for variant in kind.variants() {
            assert!(variant.applicable().contains("type"));
        }
    }

    #[test]
    fn test_plain_kind_has_one_implicit_variant() {
        let kind = ObjectKind::builder("location")
            .attribute(AttributeDecl::scalar("description"))
            .build();

        assert!(!kind.is_polymorphic());
        assert_eq!(kind.variants().len(), 1);
        assert_eq!(kind.variants()[0].name(), "location");
        assert!(kind.variants()[0].applicable().contains("description"));
    }

    #[test]
    fn test_validate_record_rejects_undeclared_and_mismatched() {
        let kind = ObjectKind::builder("location")
            .attribute(AttributeDecl::scalar("description"))
            .attribute(AttributeDecl::set("tags"))
            .build();

        let ok = AttributeRecord::new()
            .with("description", AttributeValue::scalar("x"))
            .with("tags", AttributeValue::empty_set());
        assert!(kind.validate_record(&ok).is_ok());

        let undeclared = AttributeRecord::new().with("colour", AttributeValue::scalar("red"));
        assert!(matches!(
            kind.validate_record(&undeclared),
            Err(ReconcileError::UnknownAttribute { .. })
        ));

        let mismatched = AttributeRecord::new().with("tags", AttributeValue::scalar("x"));
        assert_eq!(
            kind.validate_record(&mismatched),
            Err(ReconcileError::AttributeKindMismatch {
                kind: "location".into(),
                attribute: "tags".into(),
                expected: "set".into(),
            })
        );
    }

    #[test]
    fn test_null_representation_per_shape() {
        assert_eq!(
            AttrKind::Scalar.null_representation(),
            AttributeValue::null_scalar()
        );
        assert_eq!(AttrKind::Set.null_representation(), AttributeValue::empty_set());
    }
}
