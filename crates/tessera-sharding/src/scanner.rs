//! Reference graph scanner.
//!
//! Computes, for each resource category, which registry names are currently
//! referenced by a table rule, auto table rule, or catalog default. Drop-time
//! "is it in use" checks and post-mutation garbage collection both call these
//! functions, so the two can never disagree about what "in use" means.

use std::collections::BTreeSet;

use crate::config::{AlgorithmCategory, ShardingRuleConfig, StrategyConfig};

/// Registry names of `category` referenced anywhere in the catalog.
pub fn used_names(config: &ShardingRuleConfig, category: AlgorithmCategory) -> BTreeSet<String> {
    match category {
        AlgorithmCategory::Sharding => used_sharding_algorithm_names(config),
        AlgorithmCategory::KeyGenerator => used_key_generator_names(config),
        AlgorithmCategory::Auditor => used_auditor_names(config),
    }
}

/// Registry names of `category` with no referrer at all.
pub fn unused_names(config: &ShardingRuleConfig, category: AlgorithmCategory) -> BTreeSet<String> {
    let used = used_names(config, category);
    config
        .registry(category)
        .keys()
        .filter(|name| !used.contains(*name))
        .cloned()
        .collect()
}

/// Sharding algorithm names referenced by any strategy in the catalog.
pub fn used_sharding_algorithm_names(config: &ShardingRuleConfig) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    for table in config.tables.values() {
        collect_strategy(&mut result, table.database_strategy.as_ref());
        collect_strategy(&mut result, table.table_strategy.as_ref());
    }
    for table in config.auto_tables.values() {
        collect_strategy(&mut result, Some(&table.sharding_strategy));
    }
    collect_strategy(&mut result, config.default_database_strategy.as_ref());
    collect_strategy(&mut result, config.default_table_strategy.as_ref());
    result
}

/// Key generator names referenced by any key-generate strategy in the catalog.
pub fn used_key_generator_names(config: &ShardingRuleConfig) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    for table in config.tables.values() {
        if let Some(strategy) = &table.key_generate_strategy {
            result.insert(strategy.key_generator_name.clone());
        }
    }
    for table in config.auto_tables.values() {
        if let Some(strategy) = &table.key_generate_strategy {
            result.insert(strategy.key_generator_name.clone());
        }
    }
    if let Some(strategy) = &config.default_key_generate_strategy {
        result.insert(strategy.key_generator_name.clone());
    }
    result
}

/// Auditor names referenced by any audit strategy in the catalog.
pub fn used_auditor_names(config: &ShardingRuleConfig) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    for table in config.tables.values() {
        if let Some(strategy) = &table.audit_strategy {
            result.extend(strategy.auditor_names.iter().cloned());
        }
    }
    for table in config.auto_tables.values() {
        if let Some(strategy) = &table.audit_strategy {
            result.extend(strategy.auditor_names.iter().cloned());
        }
    }
    if let Some(strategy) = &config.default_audit_strategy {
        result.extend(strategy.auditor_names.iter().cloned());
    }
    result
}

/// Who references a registry name: the lowercase logical table names plus
/// pseudo-referrers for the catalog defaults. Used to decide whether a
/// synthesized algorithm name may safely overwrite an existing entry.
pub fn referrers(
    config: &ShardingRuleConfig,
    category: AlgorithmCategory,
    name: &str,
) -> BTreeSet<String> {
    let mut result = BTreeSet::new();
    match category {
        AlgorithmCategory::Sharding => {
            for (key, table) in &config.tables {
                if strategy_references(table.database_strategy.as_ref(), name)
                    || strategy_references(table.table_strategy.as_ref(), name)
                {
                    result.insert(key.clone());
                }
            }
            for (key, table) in &config.auto_tables {
                if strategy_references(Some(&table.sharding_strategy), name) {
                    result.insert(key.clone());
                }
            }
            if strategy_references(config.default_database_strategy.as_ref(), name) {
                result.insert(DEFAULT_DATABASE_STRATEGY.to_string());
            }
            if strategy_references(config.default_table_strategy.as_ref(), name) {
                result.insert(DEFAULT_TABLE_STRATEGY.to_string());
            }
        }
        AlgorithmCategory::KeyGenerator => {
            for (key, table) in &config.tables {
                if table
                    .key_generate_strategy
                    .as_ref()
                    .is_some_and(|strategy| strategy.key_generator_name == name)
                {
                    result.insert(key.clone());
                }
            }
            for (key, table) in &config.auto_tables {
                if table
                    .key_generate_strategy
                    .as_ref()
                    .is_some_and(|strategy| strategy.key_generator_name == name)
                {
                    result.insert(key.clone());
                }
            }
            if config
                .default_key_generate_strategy
                .as_ref()
                .is_some_and(|strategy| strategy.key_generator_name == name)
            {
                result.insert(DEFAULT_KEY_GENERATE_STRATEGY.to_string());
            }
        }
        AlgorithmCategory::Auditor => {
            for (key, table) in &config.tables {
                if table
                    .audit_strategy
                    .as_ref()
                    .is_some_and(|strategy| strategy.auditor_names.iter().any(|n| n == name))
                {
                    result.insert(key.clone());
                }
            }
            for (key, table) in &config.auto_tables {
                if table
                    .audit_strategy
                    .as_ref()
                    .is_some_and(|strategy| strategy.auditor_names.iter().any(|n| n == name))
                {
                    result.insert(key.clone());
                }
            }
            if config
                .default_audit_strategy
                .as_ref()
                .is_some_and(|strategy| strategy.auditor_names.iter().any(|n| n == name))
            {
                result.insert(DEFAULT_AUDIT_STRATEGY.to_string());
            }
        }
    }
    result
}

/// Pseudo-referrer label for the default database strategy.
pub const DEFAULT_DATABASE_STRATEGY: &str = "*default_database_strategy";
/// Pseudo-referrer label for the default table strategy.
pub const DEFAULT_TABLE_STRATEGY: &str = "*default_table_strategy";
/// Pseudo-referrer label for the default key-generate strategy.
pub const DEFAULT_KEY_GENERATE_STRATEGY: &str = "*default_key_generate_strategy";
/// Pseudo-referrer label for the default audit strategy.
pub const DEFAULT_AUDIT_STRATEGY: &str = "*default_audit_strategy";

fn collect_strategy(result: &mut BTreeSet<String>, strategy: Option<&StrategyConfig>) {
    if let Some(name) = strategy.and_then(StrategyConfig::algorithm_name) {
        result.insert(name.to_string());
    }
}

fn strategy_references(strategy: Option<&StrategyConfig>, name: &str) -> bool {
    strategy.and_then(StrategyConfig::algorithm_name) == Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AlgorithmConfig, AuditStrategyConfig, AutoTableRuleConfig, KeyGenerateStrategyConfig,
        TableRuleConfig,
    };

    fn sample_config() -> ShardingRuleConfig {
        let mut config = ShardingRuleConfig::new();
        config.tables.insert(
            "t_order".into(),
            TableRuleConfig::new("t_order", vec!["ds_0.t_order_0".into()])
                .with_table_strategy(StrategyConfig::Standard {
                    sharding_column: "order_id".into(),
                    algorithm_name: "t_order_inline".into(),
                })
                .with_key_generate_strategy(KeyGenerateStrategyConfig::new("order_id", "snow"))
                .with_audit_strategy(AuditStrategyConfig::new(vec!["audit_0".into()], true)),
        );
        config.auto_tables.insert(
            "t_item".into(),
            AutoTableRuleConfig::new(
                "t_item",
                vec!["ds_0".into()],
                StrategyConfig::Standard {
                    sharding_column: "item_id".into(),
                    algorithm_name: "t_item_mod".into(),
                },
            ),
        );
        config.default_database_strategy = Some(StrategyConfig::Hint {
            algorithm_name: "default_database_hint_inline".into(),
        });
        config
            .sharding_algorithms
            .insert("t_order_inline".into(), AlgorithmConfig::new("INLINE"));
        config
            .sharding_algorithms
            .insert("t_item_mod".into(), AlgorithmConfig::new("MOD"));
        config.sharding_algorithms.insert(
            "default_database_hint_inline".into(),
            AlgorithmConfig::new("HINT_INLINE"),
        );
        config
            .sharding_algorithms
            .insert("orphan".into(), AlgorithmConfig::new("MOD"));
        config
            .key_generators
            .insert("snow".into(), AlgorithmConfig::new("SNOWFLAKE"));
        config
            .auditors
            .insert("audit_0".into(), AlgorithmConfig::new("DML_SHARDING_CONDITIONS"));
        config
    }

    #[test]
    fn test_used_names_cover_tables_auto_tables_and_defaults() {
        let config = sample_config();
        let used = used_sharding_algorithm_names(&config);
        assert!(used.contains("t_order_inline"));
        assert!(used.contains("t_item_mod"));
        assert!(used.contains("default_database_hint_inline"));
        assert!(!used.contains("orphan"));
        assert_eq!(
            used_key_generator_names(&config),
            BTreeSet::from(["snow".to_string()])
        );
        assert_eq!(
            used_auditor_names(&config),
            BTreeSet::from(["audit_0".to_string()])
        );
    }

    #[test]
    fn test_unused_names_are_registry_minus_used() {
        let config = sample_config();
        assert_eq!(
            unused_names(&config, AlgorithmCategory::Sharding),
            BTreeSet::from(["orphan".to_string()])
        );
        assert!(unused_names(&config, AlgorithmCategory::KeyGenerator).is_empty());
        assert!(unused_names(&config, AlgorithmCategory::Auditor).is_empty());
    }

    #[test]
    fn test_referrers() {
        let config = sample_config();
        let table_refs = referrers(&config, AlgorithmCategory::Sharding, "t_order_inline");
        assert_eq!(table_refs, BTreeSet::from(["t_order".to_string()]));
        let default_refs = referrers(
            &config,
            AlgorithmCategory::Sharding,
            "default_database_hint_inline",
        );
        assert_eq!(
            default_refs,
            BTreeSet::from([DEFAULT_DATABASE_STRATEGY.to_string()])
        );
        assert!(referrers_is_empty(&config, "orphan"));
    }

    fn referrers_is_empty(config: &ShardingRuleConfig, name: &str) -> bool {
        referrers(config, AlgorithmCategory::Sharding, name).is_empty()
    }
}
