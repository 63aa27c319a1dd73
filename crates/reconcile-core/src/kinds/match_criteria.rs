//! `match-criteria` object kind
//!
//! Result criteria select operations by their outcome. A criteria object is
//! one of five mutually exclusive variants chosen by `type`; only
//! `description` is shared between them.

use crate::errors::ReconcileError;
use crate::schema::{AttributeDecl, ObjectKind};
use crate::value::AttributeValue;
use crate::variant::VariantDescriptor;
use std::fmt;
use std::str::FromStr;

pub const KIND: &str = "match-criteria";
pub const DISCRIMINATOR: &str = "type";

/// Discriminator values of `match-criteria`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchCriteriaType {
    BindResult,
    SimpleResult,
    Aggregate,
    ReplicationAssurance,
    ThirdParty,
}

impl MatchCriteriaType {
    pub const ALL: [MatchCriteriaType; 5] = [
        MatchCriteriaType::BindResult,
        MatchCriteriaType::SimpleResult,
        MatchCriteriaType::Aggregate,
        MatchCriteriaType::ReplicationAssurance,
        MatchCriteriaType::ThirdParty,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MatchCriteriaType::BindResult => "bind-result",
            MatchCriteriaType::SimpleResult => "simple-result",
            MatchCriteriaType::Aggregate => "aggregate",
            MatchCriteriaType::ReplicationAssurance => "replication-assurance",
            MatchCriteriaType::ThirdParty => "third-party",
        }
    }

    /// Attributes meaningful for this variant, besides `type` and `description`
    fn attributes(self) -> &'static [&'static str] {
        match self {
            MatchCriteriaType::BindResult => &[
                "includeAnonymousBinds",
                "includedUserBaseDN",
                "excludedUserBaseDN",
                "includedUserFilter",
                "excludedUserFilter",
            ],
            MatchCriteriaType::SimpleResult => &[
                "resultCodeCriteria",
                "resultCodeValue",
                "processingTimeCriteria",
                "processingTimeValue",
                "includedAuthzUserBaseDN",
            ],
            MatchCriteriaType::Aggregate => &[
                "allIncluded",
                "anyIncluded",
                "notAllIncluded",
                "noneIncluded",
            ],
            MatchCriteriaType::ReplicationAssurance => &[
                "localAssuranceLevel",
                "remoteAssuranceLevel",
                "assuranceTimeoutCriteria",
                "assuranceTimeoutValue",
                "responseDelayedByAssurance",
                "assuranceSatisfied",
            ],
            MatchCriteriaType::ThirdParty => &["extensionClass", "extensionArgument"],
        }
    }

    fn descriptor(self) -> VariantDescriptor {
        let variant = VariantDescriptor::new(self.as_str())
            .applies_to(["description"])
            .applies_to(self.attributes().iter().copied());
        match self {
            MatchCriteriaType::BindResult => {
                variant.default_value("includeAnonymousBinds", AttributeValue::scalar("true"))
            }
            MatchCriteriaType::SimpleResult => variant
                .default_value("resultCodeCriteria", AttributeValue::scalar("all-result-codes"))
                .default_value("processingTimeCriteria", AttributeValue::scalar("any")),
            MatchCriteriaType::Aggregate => variant,
            MatchCriteriaType::ReplicationAssurance => variant
                .default_value(
                    "localAssuranceLevel",
                    AttributeValue::set(["none", "received-any-server", "processed-all-servers"]),
                )
                .default_value(
                    "remoteAssuranceLevel",
                    AttributeValue::set([
                        "none",
                        "received-any-remote-location",
                        "received-all-remote-locations",
                        "processed-all-remote-servers",
                    ]),
                )
                .default_value("assuranceTimeoutCriteria", AttributeValue::scalar("any"))
                .default_value("responseDelayedByAssurance", AttributeValue::scalar("any"))
                .default_value("assuranceSatisfied", AttributeValue::scalar("any")),
            MatchCriteriaType::ThirdParty => variant,
        }
    }
}

impl fmt::Display for MatchCriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchCriteriaType {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReconcileError::UnresolvableVariant {
                kind: KIND.to_string(),
                value: s.to_string(),
                known: Self::ALL.iter().map(|t| t.as_str().to_string()).collect(),
            })
    }
}

/// Declaration of the `match-criteria` kind
pub fn kind() -> ObjectKind {
    let set = [
        "includedUserBaseDN",
        "excludedUserBaseDN",
        "resultCodeValue",
        "includedAuthzUserBaseDN",
        "allIncluded",
        "anyIncluded",
        "notAllIncluded",
        "noneIncluded",
        "localAssuranceLevel",
        "remoteAssuranceLevel",
    ];

    let mut builder = ObjectKind::builder(KIND)
        .discriminated_by(DISCRIMINATOR)
        .attribute(AttributeDecl::scalar("description"));

    for variant in MatchCriteriaType::ALL {
        for &name in variant.attributes() {
            let decl = if set.contains(&name) {
                AttributeDecl::set(name)
            } else if name == "extensionArgument" {
                AttributeDecl::set(name).sensitive()
            } else {
                AttributeDecl::scalar(name)
            };
            builder = builder.attribute(decl);
        }
    }

    MatchCriteriaType::ALL
        .into_iter()
        .fold(builder, |builder, variant| builder.variant(variant.descriptor()))
        .build()
}
