//! `local-db-index` object kind
//!
//! An index belongs to a local database backend; its identity is the backend
//! name plus the indexed attribute. The kind has no discriminator.

use crate::schema::{AttributeDecl, ObjectIdentity, ObjectKind};
use crate::value::AttributeValue;

pub const KIND: &str = "local-db-index";

/// Identity of the index on `attribute` in backend `backend`
pub fn identity(backend: impl Into<String>, attribute: impl Into<String>) -> ObjectIdentity {
    ObjectIdentity::nested(KIND, backend, attribute)
}

/// Declaration of the `local-db-index` kind
pub fn kind() -> ObjectKind {
    ObjectKind::builder(KIND)
        .attribute(AttributeDecl::set("indexType"))
        .attribute(AttributeDecl::scalar("indexEntryLimit"))
        .attribute(AttributeDecl::scalar("substringIndexedPrefixLength"))
        .attribute(AttributeDecl::scalar("maintainEqualityIndexWithoutFilter"))
        .attribute(AttributeDecl::set("equalityIndexFilter"))
        .attribute(AttributeDecl::scalar("primeIndex"))
        .attribute(AttributeDecl::scalar("primeInternalNodesOnly"))
        .attribute(AttributeDecl::scalar("cacheMode"))
        .default_value("primeIndex", AttributeValue::scalar("false"))
        .default_value("primeInternalNodesOnly", AttributeValue::scalar("false"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AttributeRecord;

    #[test]
    fn test_single_implicit_variant_covers_everything() {
        let kind = kind();
        assert!(!kind.is_polymorphic());
        assert_eq!(kind.variants().len(), 1);
        assert_eq!(kind.variants()[0].applicable(), &kind.attribute_names());
        kind.check_invariants().unwrap();
    }

    #[test]
    fn test_variant_resolves_without_discriminator() {
        let kind = kind();
        let variant = kind.variant_of(&AttributeRecord::new()).unwrap();
        assert_eq!(variant.name(), KIND);
        assert_eq!(
            kind.defaults_for(variant).get("primeIndex"),
            Some(&AttributeValue::scalar("false"))
        );
    }

    #[test]
    fn test_identity_is_scoped_by_backend() {
        let id = identity("userRoot", "uid");
        assert_eq!(id.parent.as_deref(), Some("userRoot"));
        assert_eq!(id.to_string(), "local-db-index/userRoot/uid");
    }
}
