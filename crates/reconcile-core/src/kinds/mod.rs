//! Built-in object kinds
//!
//! [`KindRegistry`] looks kinds up by name. [`KindRegistry::builtin`] holds
//! every kind shipped with this crate; callers may register their own.

pub mod local_db_index;
pub mod match_criteria;

pub use match_criteria::MatchCriteriaType;

use crate::schema::ObjectKind;
use std::collections::BTreeMap;

/// Object kinds by name
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    kinds: BTreeMap<String, ObjectKind>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind
    pub fn builtin() -> Self {
        Self::new()
            .register(match_criteria::kind())
            .register(local_db_index::kind())
    }

    /// Add a kind, replacing any kind with the same name
    pub fn register(mut self, kind: ObjectKind) -> Self {
        self.kinds.insert(kind.name().to_string(), kind);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ObjectKind> {
        self.kinds.get(name)
    }

    /// Kind names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectKind> {
        self.kinds.values()
    }
}
