//! Table rule and auto table rule configurations.

use serde::{Deserialize, Serialize};

use super::strategy::{AuditStrategyConfig, KeyGenerateStrategyConfig, StrategyConfig};

/// A sharding table rule with an explicit data-node placement.
///
/// `logic_table` keeps the spelling the user wrote; identity is
/// case-insensitive and the catalog keys entries by the lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRuleConfig {
    /// Logical table name.
    pub logic_table: String,
    /// Explicit data nodes, e.g. `ds_0.t_order_0`.
    pub actual_data_nodes: Vec<String>,
    /// Database-level sharding strategy; falls back to the catalog default.
    pub database_strategy: Option<StrategyConfig>,
    /// Table-level sharding strategy; falls back to the catalog default.
    pub table_strategy: Option<StrategyConfig>,
    /// Key-generate strategy.
    pub key_generate_strategy: Option<KeyGenerateStrategyConfig>,
    /// Audit strategy.
    pub audit_strategy: Option<AuditStrategyConfig>,
}

impl TableRuleConfig {
    /// Create a table rule with only a name and data nodes.
    pub fn new(logic_table: impl Into<String>, actual_data_nodes: Vec<String>) -> Self {
        Self {
            logic_table: logic_table.into(),
            actual_data_nodes,
            database_strategy: None,
            table_strategy: None,
            key_generate_strategy: None,
            audit_strategy: None,
        }
    }

    /// Set the database-level strategy.
    pub fn with_database_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.database_strategy = Some(strategy);
        self
    }

    /// Set the table-level strategy.
    pub fn with_table_strategy(mut self, strategy: StrategyConfig) -> Self {
        self.table_strategy = Some(strategy);
        self
    }

    /// Set the key-generate strategy.
    pub fn with_key_generate_strategy(mut self, strategy: KeyGenerateStrategyConfig) -> Self {
        self.key_generate_strategy = Some(strategy);
        self
    }

    /// Set the audit strategy.
    pub fn with_audit_strategy(mut self, strategy: AuditStrategyConfig) -> Self {
        self.audit_strategy = Some(strategy);
        self
    }
}

/// A sharding auto table rule: placement derived from the algorithm's shard
/// count over the listed storage units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoTableRuleConfig {
    /// Logical table name.
    pub logic_table: String,
    /// Storage units the shards spread over.
    pub actual_data_sources: Vec<String>,
    /// The sharding strategy; always present for auto tables.
    pub sharding_strategy: StrategyConfig,
    /// Key-generate strategy.
    pub key_generate_strategy: Option<KeyGenerateStrategyConfig>,
    /// Audit strategy.
    pub audit_strategy: Option<AuditStrategyConfig>,
}

impl AutoTableRuleConfig {
    /// Create an auto table rule.
    pub fn new(
        logic_table: impl Into<String>,
        actual_data_sources: Vec<String>,
        sharding_strategy: StrategyConfig,
    ) -> Self {
        Self {
            logic_table: logic_table.into(),
            actual_data_sources,
            sharding_strategy,
            key_generate_strategy: None,
            audit_strategy: None,
        }
    }

    /// Set the key-generate strategy.
    pub fn with_key_generate_strategy(mut self, strategy: KeyGenerateStrategyConfig) -> Self {
        self.key_generate_strategy = Some(strategy);
        self
    }

    /// Set the audit strategy.
    pub fn with_audit_strategy(mut self, strategy: AuditStrategyConfig) -> Self {
        self.audit_strategy = Some(strategy);
        self
    }
}
