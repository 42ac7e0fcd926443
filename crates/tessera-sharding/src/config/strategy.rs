//! Sharding, key-generate, and audit strategy configurations.

use serde::{Deserialize, Serialize};

/// The shape of a sharding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    /// No sharding: the table lives on a single node.
    None,
    /// Single sharding column, precise/range routing.
    Standard,
    /// Multiple sharding columns routed together.
    Complex,
    /// Routing decided by an out-of-band hint, no columns.
    Hint,
}

impl StrategyKind {
    /// Parse a strategy type string from a statement, ignoring case.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "none" => Some(StrategyKind::None),
            "standard" => Some(StrategyKind::Standard),
            "complex" => Some(StrategyKind::Complex),
            "hint" => Some(StrategyKind::Hint),
            _ => None,
        }
    }

    /// Whether the given number of sharding columns is valid for this shape.
    ///
    /// STANDARD requires exactly one column, COMPLEX one or more, HINT and
    /// NONE require none.
    pub fn accepts_columns(&self, count: usize) -> bool {
        match self {
            StrategyKind::None | StrategyKind::Hint => count == 0,
            StrategyKind::Standard => count == 1,
            StrategyKind::Complex => count >= 1,
        }
    }
}

/// A configured sharding strategy.
///
/// Every non-`None` variant references a sharding algorithm by registry name;
/// invariant: that name exists in `sharding_algorithms` after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyConfig {
    /// No sharding.
    None,
    /// Exactly one sharding column.
    Standard {
        sharding_column: String,
        algorithm_name: String,
    },
    /// One or more sharding columns.
    Complex {
        sharding_columns: Vec<String>,
        algorithm_name: String,
    },
    /// No sharding columns; the value comes from a hint.
    Hint { algorithm_name: String },
}

impl StrategyConfig {
    /// The referenced sharding algorithm name, if any.
    pub fn algorithm_name(&self) -> Option<&str> {
        match self {
            StrategyConfig::None => None,
            StrategyConfig::Standard { algorithm_name, .. }
            | StrategyConfig::Complex { algorithm_name, .. }
            | StrategyConfig::Hint { algorithm_name } => Some(algorithm_name),
        }
    }

    /// The sharding columns, in declaration order.
    pub fn sharding_columns(&self) -> Vec<&str> {
        match self {
            StrategyConfig::None | StrategyConfig::Hint { .. } => Vec::new(),
            StrategyConfig::Standard { sharding_column, .. } => vec![sharding_column.as_str()],
            StrategyConfig::Complex { sharding_columns, .. } => {
                sharding_columns.iter().map(String::as_str).collect()
            }
        }
    }

    /// The shape of this strategy.
    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyConfig::None => StrategyKind::None,
            StrategyConfig::Standard { .. } => StrategyKind::Standard,
            StrategyConfig::Complex { .. } => StrategyKind::Complex,
            StrategyConfig::Hint { .. } => StrategyKind::Hint,
        }
    }
}

/// A configured key-generate strategy: generated column plus key generator name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenerateStrategyConfig {
    /// Column the generated key is written to.
    pub column: String,
    /// Referenced key generator registry name.
    pub key_generator_name: String,
}

impl KeyGenerateStrategyConfig {
    /// Create a key-generate strategy config.
    pub fn new(column: impl Into<String>, key_generator_name: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            key_generator_name: key_generator_name.into(),
        }
    }
}

/// A configured audit strategy: ordered auditor names plus the hint escape hatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStrategyConfig {
    /// Referenced auditor registry names, in declaration order.
    pub auditor_names: Vec<String>,
    /// Whether a hint may disable auditing for a statement.
    pub allow_hint_disable: bool,
}

impl AuditStrategyConfig {
    /// Create an audit strategy config.
    pub fn new(auditor_names: Vec<String>, allow_hint_disable: bool) -> Self {
        Self {
            auditor_names,
            allow_hint_disable,
        }
    }
}
