//! Catalog delta fragments.
//!
//! A [`RuleDelta`] is shaped like the catalog but holds only what one
//! validated statement adds, replaces, or removes. Building the delta is
//! side-effect free; the mutator applies it in one step, so a failure during
//! checking or building can never leave the catalog half-changed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{
    AlgorithmCategory, AlgorithmConfig, AutoTableRuleConfig, StrategyConfig,
    TableReferenceRuleConfig, TableRuleConfig,
};

/// How the mutator should fold the fragment into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaMode {
    /// Union-merge new entries.
    Created,
    /// Replace named entries in place; defaults are wholesale-replaced.
    Altered,
    /// Remove named entries. The fragment carries the *current* values of
    /// everything removed so callers can release resources tied to them.
    Dropped,
}

/// The catalog fragment one statement adds, replaces, or removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDelta {
    /// How to apply the fragment.
    pub mode: DeltaMode,
    /// Table rules added, replaced, or removed.
    pub tables: Vec<TableRuleConfig>,
    /// Auto table rules added, replaced, or removed.
    pub auto_tables: Vec<AutoTableRuleConfig>,
    /// Binding groups added, replaced, or removed.
    pub binding_table_groups: Vec<TableReferenceRuleConfig>,
    /// Broadcast tables added or removed; for `Altered`, the full new set.
    pub broadcast_tables: Vec<String>,
    /// Default database strategy set, replaced, or (for `Dropped`) removed.
    pub default_database_strategy: Option<StrategyConfig>,
    /// Default table strategy set, replaced, or (for `Dropped`) removed.
    pub default_table_strategy: Option<StrategyConfig>,
    /// Sharding algorithm registrations (or, for `Dropped`, removals).
    pub sharding_algorithms: BTreeMap<String, AlgorithmConfig>,
    /// Key generator registrations (or removals).
    pub key_generators: BTreeMap<String, AlgorithmConfig>,
    /// Auditor registrations (or removals).
    pub auditors: BTreeMap<String, AlgorithmConfig>,
    /// Whether the mutation removed or replaced referrers, so the mutator
    /// must garbage-collect registry entries left without one.
    pub prune_unused: bool,
}

impl RuleDelta {
    /// Create an empty delta for the given mode.
    pub fn new(mode: DeltaMode) -> Self {
        Self {
            mode,
            tables: Vec::new(),
            auto_tables: Vec::new(),
            binding_table_groups: Vec::new(),
            broadcast_tables: Vec::new(),
            default_database_strategy: None,
            default_table_strategy: None,
            sharding_algorithms: BTreeMap::new(),
            key_generators: BTreeMap::new(),
            auditors: BTreeMap::new(),
            prune_unused: false,
        }
    }

    /// Whether applying the delta would change nothing.
    pub fn is_noop(&self) -> bool {
        self.tables.is_empty()
            && self.auto_tables.is_empty()
            && self.binding_table_groups.is_empty()
            && self.broadcast_tables.is_empty()
            && self.default_database_strategy.is_none()
            && self.default_table_strategy.is_none()
            && self.sharding_algorithms.is_empty()
            && self.key_generators.is_empty()
            && self.auditors.is_empty()
    }

    /// Mutable access to one of the three registry fragments.
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
