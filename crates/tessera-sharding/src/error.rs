//! Error types for the sharding rule engine.
//!
//! Every error carries the rule kind, the database it was raised for, and
//! *all* offending names, so a batch statement reports every failure in one
//! response instead of the first one hit.

use thiserror::Error;

fn rule_names_suffix(names: &[String]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!("s `{}`", names.join(", "))
    }
}

/// Errors raised while checking a rule definition statement.
///
/// Only checkers construct these; delta builders and the mutator are
/// infallible by design, so a failed operation can never leave the catalog
/// partially mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShardingRuleError {
    /// A targeted rule/table/strategy/group does not exist and no `IF EXISTS` applies.
    #[error("missing required {rule_kind} rule{} in database `{database}`", rule_names_suffix(names))]
    MissingRequiredRule {
        rule_kind: String,
        database: String,
        names: Vec<String>,
    },

    /// A declared name already exists, or is declared twice within one statement.
    #[error("duplicate {rule_kind} rule names `{}` in database `{database}`", names.join(", "))]
    DuplicateRule {
        rule_kind: String,
        database: String,
        names: Vec<String>,
    },

    /// Structural violation, e.g. an incompatible binding group.
    #[error("invalid {rule_kind} configuration for `{}` in database `{database}`: {reason}", names.join(", "))]
    InvalidRuleConfiguration {
        rule_kind: String,
        database: String,
        names: Vec<String>,
        reason: String,
    },

    /// A referenced algorithm/key-generator/auditor name is not registered.
    #[error("missing required {rule_kind} `{}` in database `{database}`", names.join(", "))]
    MissingRequiredAlgorithm {
        rule_kind: String,
        database: String,
        names: Vec<String>,
    },

    /// A declared algorithm type identifier has no known implementation.
    #[error("unregistered {rule_kind} types `{}` in database `{database}`", names.join(", "))]
    UnregisteredAlgorithm {
        rule_kind: String,
        database: String,
        names: Vec<String>,
    },

    /// Strategy type string unrecognized, or required algorithm properties absent.
    #[error("invalid {rule_kind} configuration for `{}` in database `{database}`: {reason}", names.join(", "))]
    InvalidAlgorithmConfiguration {
        rule_kind: String,
        database: String,
        names: Vec<String>,
        reason: String,
    },

    /// DROP of an algorithm/key-generator/auditor that is still referenced.
    #[error("{rule_kind} `{}` is still in used in database `{database}`", names.join(", "))]
    AlgorithmInUsed {
        rule_kind: String,
        database: String,
        names: Vec<String>,
    },

    /// DROP of a rule that is still referenced, e.g. a table in a binding group.
    #[error("{rule_kind} rules `{}` are still in used in database `{database}`", names.join(", "))]
    RuleInUsed {
        rule_kind: String,
        database: String,
        names: Vec<String>,
    },
}

impl ShardingRuleError {
    /// The kind of rule or resource the error is about.
    pub fn rule_kind(&self) -> &str {
        match self {
            Self::MissingRequiredRule { rule_kind, .. }
            | Self::DuplicateRule { rule_kind, .. }
            | Self::InvalidRuleConfiguration { rule_kind, .. }
            | Self::MissingRequiredAlgorithm { rule_kind, .. }
            | Self::UnregisteredAlgorithm { rule_kind, .. }
            | Self::InvalidAlgorithmConfiguration { rule_kind, .. }
            | Self::AlgorithmInUsed { rule_kind, .. }
            | Self::RuleInUsed { rule_kind, .. } => rule_kind,
        }
    }

    /// The database the rejected statement targeted.
    pub fn database(&self) -> &str {
        match self {
            Self::MissingRequiredRule { database, .. }
            | Self::DuplicateRule { database, .. }
            | Self::InvalidRuleConfiguration { database, .. }
            | Self::MissingRequiredAlgorithm { database, .. }
            | Self::UnregisteredAlgorithm { database, .. }
            | Self::InvalidAlgorithmConfiguration { database, .. }
            | Self::AlgorithmInUsed { database, .. }
            | Self::RuleInUsed { database, .. } => database,
        }
    }

    /// Every offending name, never just the first.
    pub fn names(&self) -> &[String] {
        match self {
            Self::MissingRequiredRule { names, .. }
            | Self::DuplicateRule { names, .. }
            | Self::InvalidRuleConfiguration { names, .. }
            | Self::MissingRequiredAlgorithm { names, .. }
            | Self::UnregisteredAlgorithm { names, .. }
            | Self::InvalidAlgorithmConfiguration { names, .. }
            | Self::AlgorithmInUsed { names, .. }
            | Self::RuleInUsed { names, .. } => names,
        }
    }
}

/// Type alias for engine results.
pub type Result<T> = std::result::Result<T, ShardingRuleError>;
