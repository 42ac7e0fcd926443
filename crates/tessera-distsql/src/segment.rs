//! Statement segments: the reusable building blocks of parsed rule statements.
//!
//! A segment mirrors one clause of the DistSQL grammar. Strategy and
//! key-generate segments may either reference an already registered algorithm
//! by name or carry an inline [`AlgorithmSegment`] definition; the engine
//! synthesizes a deterministic registry name for inline definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An inline algorithm definition: `TYPE(NAME='mod', PROPERTIES('sharding-count'='4'))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSegment {
    /// Algorithm type identifier, e.g. `MOD` or `INLINE`.
    pub type_name: String,
    /// Algorithm properties; keys and values are uninterpreted strings.
    pub props: BTreeMap<String, String>,
}

impl AlgorithmSegment {
    /// Create an algorithm segment with no properties.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            props: BTreeMap::new(),
        }
    }

    /// Add a property.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }
}

/// An explicitly named algorithm definition, as used by
/// `CREATE SHARDING ALGORITHM name (...)` and its key-generator/auditor twins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAlgorithmSegment {
    /// Registry name declared by the statement.
    pub name: String,
    /// The algorithm definition.
    pub algorithm: AlgorithmSegment,
}

impl NamedAlgorithmSegment {
    /// Create a named algorithm segment.
    pub fn new(name: impl Into<String>, algorithm: AlgorithmSegment) -> Self {
        Self {
            name: name.into(),
            algorithm,
        }
    }
}

/// A sharding strategy clause.
///
/// `strategy_type` is the raw string from the parser (`NONE`, `STANDARD`,
/// `COMPLEX`, `HINT`); the engine validates it. Exactly one of
/// `algorithm_name` (a reference to a registered algorithm) or `algorithm`
/// (an inline definition) is expected for non-`NONE` strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySegment {
    /// Strategy type string as written in the statement.
    pub strategy_type: String,
    /// Sharding column(s); comma-joined for COMPLEX strategies.
    pub sharding_column: Option<String>,
    /// Reference to an already registered sharding algorithm.
    pub algorithm_name: Option<String>,
    /// Inline algorithm definition.
    pub algorithm: Option<AlgorithmSegment>,
}

impl StrategySegment {
    /// Create a `NONE` strategy segment.
    pub fn none() -> Self {
        Self {
            strategy_type: "NONE".into(),
            sharding_column: None,
            algorithm_name: None,
            algorithm: None,
        }
    }

    /// Create a strategy segment with an inline algorithm definition.
    pub fn inline(
        strategy_type: impl Into<String>,
        sharding_column: Option<&str>,
        algorithm: AlgorithmSegment,
    ) -> Self {
        Self {
            strategy_type: strategy_type.into(),
            sharding_column: sharding_column.map(Into::into),
            algorithm_name: None,
            algorithm: Some(algorithm),
        }
    }

    /// Create a strategy segment referencing a registered algorithm by name.
    pub fn named(
        strategy_type: impl Into<String>,
        sharding_column: Option<&str>,
        algorithm_name: impl Into<String>,
    ) -> Self {
        Self {
            strategy_type: strategy_type.into(),
            sharding_column: sharding_column.map(Into::into),
            algorithm_name: Some(algorithm_name.into()),
            algorithm: None,
        }
    }
}

/// A key-generate clause: `KEY_GENERATE_STRATEGY(COLUMN=..., ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenerateSegment {
    /// Generated-key column.
    pub column: String,
    /// Reference to an already registered key generator.
    pub key_generator_name: Option<String>,
    /// Inline key generator definition.
    pub algorithm: Option<AlgorithmSegment>,
}

impl KeyGenerateSegment {
    /// Create a key-generate segment with an inline definition.
    pub fn inline(column: impl Into<String>, algorithm: AlgorithmSegment) -> Self {
        Self {
            column: column.into(),
            key_generator_name: None,
            algorithm: Some(algorithm),
        }
    }

    /// Create a key-generate segment referencing a registered key generator.
    pub fn named(column: impl Into<String>, key_generator_name: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            key_generator_name: Some(key_generator_name.into()),
            algorithm: None,
        }
    }
}

/// One auditor inside an audit strategy clause. The parser derives the
/// auditor name from the table name, algorithm type, and clause position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditorSegment {
    /// Auditor registry name.
    pub name: String,
    /// Inline auditor algorithm definition.
    pub algorithm: AlgorithmSegment,
}

/// An audit strategy clause: `AUDIT_STRATEGY(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStrategySegment {
    /// Auditors, in declaration order.
    pub auditors: Vec<AuditorSegment>,
    /// Whether a hint may disable auditing.
    pub allow_hint_disable: bool,
}

/// A sharding table rule with an explicit data-node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRuleSegment {
    /// Logical table name.
    pub table: String,
    /// Explicit data nodes, e.g. `ds_0.t_order_0`.
    pub data_nodes: Vec<String>,
    /// Database-level sharding strategy.
    pub database_strategy: Option<StrategySegment>,
    /// Table-level sharding strategy.
    pub table_strategy: Option<StrategySegment>,
    /// Key-generate strategy.
    pub key_generate: Option<KeyGenerateSegment>,
    /// Audit strategy.
    pub audit: Option<AuditStrategySegment>,
}

impl TableRuleSegment {
    /// Create a table rule segment with only a table name and data nodes.
    pub fn new(table: impl Into<String>, data_nodes: Vec<String>) -> Self {
        Self {
            table: table.into(),
            data_nodes,
            database_strategy: None,
            table_strategy: None,
            key_generate: None,
            audit: None,
        }
    }

    /// Set the database-level strategy.
    pub fn with_database_strategy(mut self, strategy: StrategySegment) -> Self {
        self.database_strategy = Some(strategy);
        self
    }

    /// Set the table-level strategy.
    pub fn with_table_strategy(mut self, strategy: StrategySegment) -> Self {
        self.table_strategy = Some(strategy);
        self
    }

    /// Set the key-generate strategy.
    pub fn with_key_generate(mut self, key_generate: KeyGenerateSegment) -> Self {
        self.key_generate = Some(key_generate);
        self
    }

    /// Set the audit strategy.
    pub fn with_audit(mut self, audit: AuditStrategySegment) -> Self {
        self.audit = Some(audit);
        self
    }
}

/// A sharding auto table rule: placement is derived from the algorithm's
/// shard count rather than an explicit node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoTableRuleSegment {
    /// Logical table name.
    pub table: String,
    /// Storage units the shards spread over.
    pub storage_units: Vec<String>,
    /// Sharding column.
    pub sharding_column: Option<String>,
    /// Reference to an already registered sharding algorithm.
    pub algorithm_name: Option<String>,
    /// Inline algorithm definition.
    pub algorithm: Option<AlgorithmSegment>,
    /// Key-generate strategy.
    pub key_generate: Option<KeyGenerateSegment>,
    /// Audit strategy.
    pub audit: Option<AuditStrategySegment>,
}

impl AutoTableRuleSegment {
    /// Create an auto table rule segment with only a table name and storage units.
    pub fn new(table: impl Into<String>, storage_units: Vec<String>) -> Self {
        Self {
            table: table.into(),
            storage_units,
            sharding_column: None,
            algorithm_name: None,
            algorithm: None,
            key_generate: None,
            audit: None,
        }
    }

    /// Set the sharding column.
    pub fn with_sharding_column(mut self, column: impl Into<String>) -> Self {
        self.sharding_column = Some(column.into());
        self
    }

    /// Set an inline sharding algorithm.
    pub fn with_algorithm(mut self, algorithm: AlgorithmSegment) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Reference a registered sharding algorithm.
    pub fn with_algorithm_name(mut self, name: impl Into<String>) -> Self {
        self.algorithm_name = Some(name.into());
        self
    }

    /// Set the key-generate strategy.
    pub fn with_key_generate(mut self, key_generate: KeyGenerateSegment) -> Self {
        self.key_generate = Some(key_generate);
        self
    }

    /// Set the audit strategy.
    pub fn with_audit(mut self, audit: AuditStrategySegment) -> Self {
        self.audit = Some(audit);
        self
    }
}

/// Either kind of table rule inside a CREATE/ALTER SHARDING TABLE RULE statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableRuleDefinition {
    /// Explicit data-node table rule.
    Table(TableRuleSegment),
    /// Auto table rule.
    Auto(AutoTableRuleSegment),
}

impl TableRuleDefinition {
    /// Logical table name of either variant.
    pub fn table(&self) -> &str {
        match self {
            TableRuleDefinition::Table(rule) => &rule.table,
            TableRuleDefinition::Auto(rule) => &rule.table,
        }
    }
}

/// A table reference (binding) group: a name plus a comma-joined member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReferenceRuleSegment {
    /// Group name.
    pub name: String,
    /// Comma-joined logical table names.
    pub reference: String,
}

impl TableReferenceRuleSegment {
    /// Create a table reference rule segment.
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }

    /// Member table names, trimmed.
    pub fn member_tables(&self) -> Vec<&str> {
        self.reference
            .split(',')
            .map(str::trim)
            .filter(|table| !table.is_empty())
            .collect()
    }
}
