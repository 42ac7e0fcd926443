//! Catalog mutator.
//!
//! Applies one delta to a copy of the catalog. The caller swaps the returned
//! value in atomically, so concurrent readers see either the old or the new
//! catalog, never an intermediate state. Garbage collection of orphaned
//! registry entries is folded into the same step whenever the delta removed
//! or replaced referrers.

use tracing::debug;

use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::delta::{DeltaMode, RuleDelta};
use crate::name::CaseInsensitiveSet;
use crate::scanner;

/// Apply `delta` to a clone of `config`. Returns the new catalog and whether
/// it is now structurally empty, signalling that the sharding rule type
/// itself can be deregistered.
pub fn apply(config: &ShardingRuleConfig, delta: &RuleDelta) -> (ShardingRuleConfig, bool) {
    let mut next = config.clone();
    match delta.mode {
        DeltaMode::Created => apply_created(&mut next, delta),
        DeltaMode::Altered => apply_altered(&mut next, delta),
        DeltaMode::Dropped => apply_dropped(&mut next, delta),
    }
    if delta.prune_unused {
        prune_unused(&mut next);
    }
    let now_empty = next.is_empty();
    debug!(
        mode = ?delta.mode,
        tables = next.tables.len(),
        auto_tables = next.auto_tables.len(),
        now_empty,
        "applied rule delta"
    );
    (next, now_empty)
}

fn apply_created(config: &mut ShardingRuleConfig, delta: &RuleDelta) {
    for table in &delta.tables {
        config
            .tables
            .insert(table.logic_table.to_lowercase(), table.clone());
    }
    for table in &delta.auto_tables {
        config
            .auto_tables
            .insert(table.logic_table.to_lowercase(), table.clone());
    }
    config
        .binding_table_groups
        .extend(delta.binding_table_groups.iter().cloned());
    config
        .broadcast_tables
        .extend(delta.broadcast_tables.iter().cloned());
    if let Some(strategy) = &delta.default_database_strategy {
        config.default_database_strategy = Some(strategy.clone());
    }
    if let Some(strategy) = &delta.default_table_strategy {
        config.default_table_strategy = Some(strategy.clone());
    }
    merge_registries(config, delta);
}

fn apply_altered(config: &mut ShardingRuleConfig, delta: &RuleDelta) {
    // An altered table may switch kind, so clear both maps before inserting.
    for table in &delta.tables {
        let key = table.logic_table.to_lowercase();
        config.auto_tables.remove(&key);
        config.tables.insert(key, table.clone());
    }
    for table in &delta.auto_tables {
        let key = table.logic_table.to_lowercase();
        config.tables.remove(&key);
        config.auto_tables.insert(key, table.clone());
    }
    for group in &delta.binding_table_groups {
        if let Some(existing) = config
            .binding_table_groups
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&group.name))
        {
            *existing = group.clone();
        } else {
            config.binding_table_groups.push(group.clone());
        }
    }
    if !delta.broadcast_tables.is_empty() {
        config.broadcast_tables = delta.broadcast_tables.iter().cloned().collect();
    }
    if let Some(strategy) = &delta.default_database_strategy {
        config.default_database_strategy = Some(strategy.clone());
    }
    if let Some(strategy) = &delta.default_table_strategy {
        config.default_table_strategy = Some(strategy.clone());
    }
    merge_registries(config, delta);
}

fn apply_dropped(config: &mut ShardingRuleConfig, delta: &RuleDelta) {
    for table in &delta.tables {
        config.tables.remove(&table.logic_table.to_lowercase());
    }
    for table in &delta.auto_tables {
        config.auto_tables.remove(&table.logic_table.to_lowercase());
    }
    if !delta.binding_table_groups.is_empty() {
        let dropped: CaseInsensitiveSet = delta
            .binding_table_groups
            .iter()
            .map(|group| group.name.as_str())
            .collect();
        config
            .binding_table_groups
            .retain(|group| !dropped.contains(&group.name));
    }
    for table in &delta.broadcast_tables {
        config.broadcast_tables.remove(table);
    }
    if delta.default_database_strategy.is_some() {
        config.default_database_strategy = None;
    }
    if delta.default_table_strategy.is_some() {
        config.default_table_strategy = None;
    }
    for category in CATEGORIES {
        for name in delta_registry(delta, category).keys() {
            config.registry_mut(category).remove(name);
        }
    }
}

const CATEGORIES: [AlgorithmCategory; 3] = [
    AlgorithmCategory::Sharding,
    AlgorithmCategory::KeyGenerator,
    AlgorithmCategory::Auditor,
];

fn merge_registries(config: &mut ShardingRuleConfig, delta: &RuleDelta) {
    for category in CATEGORIES {
        for (name, algorithm) in delta_registry(delta, category) {
            config
                .registry_mut(category)
                .insert(name.clone(), algorithm.clone());
        }
    }
}

fn delta_registry(
    delta: &RuleDelta,
    category: AlgorithmCategory,
) -> &std::collections::BTreeMap<String, crate::config::AlgorithmConfig> {
    match category {
        AlgorithmCategory::Sharding => &delta.sharding_algorithms,
        AlgorithmCategory::KeyGenerator => &delta.key_generators,
        AlgorithmCategory::Auditor => &delta.auditors,
    }
}

/// Remove every registry entry with no remaining referrer, per category.
/// Referrers are tables, auto tables, and the catalog defaults only, so one
/// pass cannot create new orphans.
fn prune_unused(config: &mut ShardingRuleConfig) {
    for category in CATEGORIES {
        let unused = scanner::unused_names(config, category);
        if !unused.is_empty() {
            debug!(category = %category, count = unused.len(), "pruning orphaned registry entries");
        }
        for name in unused {
            config.registry_mut(category).remove(&name);
        }
    }
}
