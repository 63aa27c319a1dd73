//! Variant resolution for polymorphic object kinds
//!
//! A polymorphic kind (one with a discriminator attribute) has a closed list
//! of variants. Each variant names the attributes that mean something for that
//! shape and the defaults applied when the user leaves one of them absent.
//! Every other declared attribute is "not applicable" and is cleared, so that
//! switching variants retracts the old shape's attributes.

use crate::errors::{ReconcileError, Result};
use crate::record::AttributeRecord;
use crate::schema::ObjectKind;
use crate::value::{AttributeValue, Value};
use std::collections::{BTreeMap, BTreeSet};

/// One shape of a polymorphic object kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    name: String,
    applicable: BTreeSet<String>,
    defaults: BTreeMap<String, AttributeValue>,
}

impl VariantDescriptor {
    /// A variant selected by discriminator value `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            applicable: BTreeSet::new(),
            defaults: BTreeMap::new(),
        }
    }

    /// Mark attributes as meaningful for this variant
    pub fn applies_to<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable
            .extend(attributes.into_iter().map(Into::into));
        self
    }

    /// Default applied when the user leaves `attribute` absent
    pub fn default_value(mut self, attribute: impl Into<String>, value: AttributeValue) -> Self {
        self.defaults.insert(attribute.into(), value);
        self
    }

    /// The discriminator value
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn applicable(&self) -> &BTreeSet<String> {
        &self.applicable
    }

    pub fn defaults(&self) -> &BTreeMap<String, AttributeValue> {
        &self.defaults
    }
}

impl ObjectKind {
    /// Discriminator values accepted by this kind, in declaration order
    pub fn known_variants(&self) -> Vec<String> {
        self.variants().iter().map(|v| v.name().to_string()).collect()
    }

    /// Exact match of `value` against the closed variant list
    ///
    /// # Errors
    ///
    /// `UnresolvableVariant` when no variant carries that discriminator value.
    pub fn resolve_variant(&self, value: &str) -> Result<&VariantDescriptor> {
        self.variants()
            .iter()
            .find(|v| v.name() == value)
            .ok_or_else(|| ReconcileError::UnresolvableVariant {
                kind: self.name().to_string(),
                value: value.to_string(),
                known: self.known_variants(),
            })
    }

    /// Variant selected by the record's discriminator
    ///
    /// Kinds without a discriminator always resolve to their implicit variant.
    ///
    /// # Errors
    ///
    /// - `MissingDiscriminator` when the discriminator is absent, unknown or null
    /// - `UnresolvableVariant` when its value is not a known variant
    pub fn variant_of(&self, record: &AttributeRecord) -> Result<&VariantDescriptor> {
        let Some(discriminator) = self.discriminator() else {
            return self.variants().first().ok_or_else(|| {
                ReconcileError::InvariantViolation {
                    kind: self.name().to_string(),
                    reason: "kind declares no variant".to_string(),
                }
            });
        };

        match record.scalar(discriminator) {
            Value::Present(value) => self.resolve_variant(value),
            _ => Err(ReconcileError::MissingDiscriminator {
                kind: self.name().to_string(),
                attribute: discriminator.to_string(),
            }),
        }
    }

    /// Attributes meaningful for `variant`
    pub fn applicable_attributes(&self, variant: &VariantDescriptor) -> BTreeSet<String> {
        variant.applicable().clone()
    }

    /// Defaults for `variant`, as a record
    pub fn defaults_for(&self, variant: &VariantDescriptor) -> AttributeRecord {
        variant
            .defaults()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Null representation of every attribute that does not apply to `variant`
    pub fn not_applicable(&self, variant: &VariantDescriptor) -> AttributeRecord {
        self.attributes()
            .iter()
            .filter(|decl| !variant.applicable().contains(&decl.name))
            .map(|decl| (decl.name.clone(), decl.kind.null_representation()))
            .collect()
    }

    /// Verify the variant descriptors of this kind
    ///
    /// Checked properties:
    /// - at least one variant, with unique names
    /// - every applicable or defaulted attribute is declared
    /// - defaults only cover applicable attributes and match the declared shape
    /// - the union of applicable sets is the full attribute set
    ///
    /// Intended for tests; descriptor mistakes are programming errors.
    ///
    /// # Errors
    ///
    /// `InvariantViolation` naming the first broken property.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |reason: String| ReconcileError::InvariantViolation {
            kind: self.name().to_string(),
            reason,
        };

        if self.variants().is_empty() {
            return Err(violation("kind declares no variant".to_string()));
        }

        let declared = self.attribute_names();
        let mut names = BTreeSet::new();
        let mut covered = BTreeSet::new();

        for variant in self.variants() {
            if !names.insert(variant.name()) {
                return Err(violation(format!("duplicate variant '{}'", variant.name())));
            }
            if let Some(undeclared) = variant.applicable().difference(&declared).next() {
                return Err(violation(format!(
                    "variant '{}' applies to undeclared attribute '{}'",
                    variant.name(),
                    undeclared
                )));
            }
            for (name, value) in variant.defaults() {
                if !variant.applicable().contains(name) {
                    return Err(violation(format!(
                        "variant '{}' defaults attribute '{}' that does not apply to it",
                        variant.name(),
                        name
                    )));
                }
                let matches_decl = self
                    .attribute(name)
                    .is_some_and(|decl| decl.kind.matches(value));
                if !matches_decl || value.is_absent() || value.is_unknown() {
                    return Err(violation(format!(
                        "variant '{}' default for '{}' does not match its declaration",
                        variant.name(),
                        name
                    )));
                }
            }
            covered.extend(variant.applicable().iter().cloned());
        }

        if let Some(orphan) = declared.difference(&covered).next() {
            return Err(violation(format!(
                "attribute '{}' applies to no variant",
                orphan
            )));
        }
        Ok(())
    }
}
