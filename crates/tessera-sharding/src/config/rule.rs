//! The root rule catalog aggregate for one logical database.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::algorithm::{AlgorithmCategory, AlgorithmConfig};
use super::reference::TableReferenceRuleConfig;
use super::strategy::{AuditStrategyConfig, KeyGenerateStrategyConfig, StrategyConfig};
use super::table::{AutoTableRuleConfig, TableRuleConfig};
use crate::name::CaseInsensitiveSet;

/// The sharding rule catalog of one logical database.
///
/// Mutated only through the checker → builder → mutator pipeline; queries
/// treat it as read-only. `tables`, `auto_tables`, and `broadcast_tables` are
/// keyed by the lowercase logical name (table identity is case-insensitive);
/// the three registries are keyed by their case-sensitive resource names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardingRuleConfig {
    /// Explicitly placed sharding tables, keyed by lowercase logical name.
    pub tables: BTreeMap<String, TableRuleConfig>,
    /// Auto tables, keyed by lowercase logical name.
    pub auto_tables: BTreeMap<String, AutoTableRuleConfig>,
    /// Catalog-wide default database sharding strategy.
    pub default_database_strategy: Option<StrategyConfig>,
    /// Catalog-wide default table sharding strategy.
    pub default_table_strategy: Option<StrategyConfig>,
    /// Catalog-wide default key-generate strategy.
    pub default_key_generate_strategy: Option<KeyGenerateStrategyConfig>,
    /// Catalog-wide default audit strategy.
    pub default_audit_strategy: Option<AuditStrategyConfig>,
    /// Named sharding algorithms.
    pub sharding_algorithms: BTreeMap<String, AlgorithmConfig>,
    /// Named key generators.
    pub key_generators: BTreeMap<String, AlgorithmConfig>,
    /// Named auditors.
    pub auditors: BTreeMap<String, AlgorithmConfig>,
    /// Table reference (binding) groups, in declaration order.
    pub binding_table_groups: Vec<TableReferenceRuleConfig>,
    /// Broadcast tables, lowercase.
    pub broadcast_tables: BTreeSet<String>,
}

impl ShardingRuleConfig {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the catalog is structurally empty, i.e. the sharding rule type
    /// itself can be deregistered for the database.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.auto_tables.is_empty()
            && self.default_database_strategy.is_none()
            && self.default_table_strategy.is_none()
            && self.default_key_generate_strategy.is_none()
            && self.default_audit_strategy.is_none()
            && self.sharding_algorithms.is_empty()
            && self.key_generators.is_empty()
            && self.auditors.is_empty()
            && self.binding_table_groups.is_empty()
            && self.broadcast_tables.is_empty()
    }

    /// Whether a logical table exists as a table rule or auto table rule,
    /// ignoring case.
    pub fn contains_logic_table(&self, table: &str) -> bool {
        let key = table.to_lowercase();
        self.tables.contains_key(&key) || self.auto_tables.contains_key(&key)
    }

    /// All logical table names (table rules and auto tables).
    pub fn logic_table_names(&self) -> CaseInsensitiveSet {
        self.tables
            .keys()
            .chain(self.auto_tables.keys())
            .map(String::as_str)
            .collect()
    }

    /// The binding group a table belongs to, if any. Invariant: at most one.
    pub fn binding_group_containing(&self, table: &str) -> Option<&TableReferenceRuleConfig> {
        self.binding_table_groups
            .iter()
            .find(|group| group.contains_table(table))
    }

    /// A binding group by name, ignoring case.
    pub fn binding_group(&self, name: &str) -> Option<&TableReferenceRuleConfig> {
        self.binding_table_groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
    }

    /// All binding group names.
    pub fn binding_group_names(&self) -> CaseInsensitiveSet {
        self.binding_table_groups
            .iter()
            .map(|group| group.name.as_str())
            .collect()
    }

    /// The registry for a resource category.
    pub fn registry(&self, category: AlgorithmCategory) -> &BTreeMap<String, AlgorithmConfig> {
        match category {
            AlgorithmCategory::Sharding => &self.sharding_algorithms,
            AlgorithmCategory::KeyGenerator => &self.key_generators,
            AlgorithmCategory::Auditor => &self.auditors,
        }
    }

    /// Mutable access to the registry for a resource category.
    pub fn registry_mut(
        &mut self,
        category: AlgorithmCategory,
    ) -> &mut BTreeMap<String, AlgorithmConfig> {
        match category {
            AlgorithmCategory::Sharding => &mut self.sharding_algorithms,
            AlgorithmCategory::KeyGenerator => &mut self.key_generators,
            AlgorithmCategory::Auditor => &mut self.auditors,
        }
    }
}
