//! Named algorithm definitions shared by the three resource registries.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A registered algorithm: a type identifier plus a property bag.
///
/// The engine never executes algorithms; it only registers, references,
/// validates, and reclaims them by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    /// Algorithm type identifier, e.g. `MOD` or `SNOWFLAKE`.
    pub algorithm_type: String,
    /// Uninterpreted configuration properties.
    pub props: BTreeMap<String, String>,
}

impl AlgorithmConfig {
    /// Create an algorithm config with no properties.
    pub fn new(algorithm_type: impl Into<String>) -> Self {
        Self {
            algorithm_type: algorithm_type.into(),
            props: BTreeMap::new(),
        }
    }

    /// Add a property.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// The three classes of named resources the catalog keeps registries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgorithmCategory {
    /// Sharding algorithms referenced by sharding strategies.
    Sharding,
    /// Key generators referenced by key-generate strategies.
    KeyGenerator,
    /// Audit algorithms referenced by audit strategies.
    Auditor,
}

impl fmt::Display for AlgorithmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmCategory::Sharding => write!(f, "sharding algorithm"),
            AlgorithmCategory::KeyGenerator => write!(f, "key generator"),
            AlgorithmCategory::Auditor => write!(f, "sharding auditor"),
        }
    }
}
