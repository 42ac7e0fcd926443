//! Read-only catalog queries backing the SHOW-style statements: unused
//! resources, which tables use a given resource, and rule counts. Built on
//! the same reference scanner the drop checks and GC use.

use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::scanner;

/// Sharding algorithm names with no referrer.
pub fn unused_sharding_algorithms(config: &ShardingRuleConfig) -> Vec<String> {
    scanner::unused_names(config, AlgorithmCategory::Sharding)
        .into_iter()
        .collect()
}

/// Key generator names with no referrer.
pub fn unused_key_generators(config: &ShardingRuleConfig) -> Vec<String> {
    scanner::unused_names(config, AlgorithmCategory::KeyGenerator)
        .into_iter()
        .collect()
}

/// Auditor names with no referrer.
pub fn unused_auditors(config: &ShardingRuleConfig) -> Vec<String> {
    scanner::unused_names(config, AlgorithmCategory::Auditor)
        .into_iter()
        .collect()
}

/// Logical tables whose strategies reference the sharding algorithm `name`.
pub fn table_rules_used_algorithm(config: &ShardingRuleConfig, name: &str) -> Vec<String> {
    referring_tables(config, AlgorithmCategory::Sharding, name)
}

/// Logical tables whose key-generate strategies reference the generator `name`.
pub fn table_rules_used_key_generator(config: &ShardingRuleConfig, name: &str) -> Vec<String> {
    referring_tables(config, AlgorithmCategory::KeyGenerator, name)
}

/// Logical tables whose audit strategies reference the auditor `name`.
pub fn table_rules_used_auditor(config: &ShardingRuleConfig, name: &str) -> Vec<String> {
    referring_tables(config, AlgorithmCategory::Auditor, name)
}

fn referring_tables(
    config: &ShardingRuleConfig,
    category: AlgorithmCategory,
    name: &str,
) -> Vec<String> {
    scanner::referrers(config, category, name)
        .into_iter()
        // Default-strategy pseudo referrers are not tables.
        .filter(|referrer| !referrer.starts_with('*'))
        .collect()
}

/// Per-kind rule counts for one catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuleCount {
    pub tables: usize,
    pub auto_tables: usize,
    pub binding_table_groups: usize,
    pub broadcast_tables: usize,
}

/// Count the rules of each kind in the catalog.
pub fn rule_count(config: &ShardingRuleConfig) -> RuleCount {
    RuleCount {
        tables: config.tables.len(),
        auto_tables: config.auto_tables.len(),
        binding_table_groups: config.binding_table_groups.len(),
        broadcast_tables: config.broadcast_tables.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AlgorithmConfig, KeyGenerateStrategyConfig, StrategyConfig, TableRuleConfig,
    };

    fn sample() -> ShardingRuleConfig {
        let mut config = ShardingRuleConfig::new();
        config.tables.insert(
            "t_order".into(),
            TableRuleConfig::new("t_order", vec!["ds_0.t_order_0".into()])
                .with_table_strategy(StrategyConfig::Standard {
                    sharding_column: "order_id".into(),
                    algorithm_name: "algo_a".into(),
                })
                .with_key_generate_strategy(KeyGenerateStrategyConfig::new("order_id", "snow")),
        );
        config
            .sharding_algorithms
            .insert("algo_a".into(), AlgorithmConfig::new("MOD"));
        config
            .sharding_algorithms
            .insert("algo_unused".into(), AlgorithmConfig::new("MOD"));
        config
            .key_generators
            .insert("snow".into(), AlgorithmConfig::new("SNOWFLAKE"));
        config.broadcast_tables.insert("t_dict".into());
        config
    }

    #[test]
    fn test_unused_and_used_queries() {
        let config = sample();
        assert_eq!(unused_sharding_algorithms(&config), vec!["algo_unused".to_string()]);
        assert!(unused_key_generators(&config).is_empty());
        assert_eq!(
            table_rules_used_algorithm(&config, "algo_a"),
            vec!["t_order".to_string()]
        );
        assert_eq!(
            table_rules_used_key_generator(&config, "snow"),
            vec!["t_order".to_string()]
        );
        assert!(table_rules_used_auditor(&config, "audit_0").is_empty());
    }

    #[test]
    fn test_rule_count() {
        let config = sample();
        assert_eq!(
            rule_count(&config),
            RuleCount {
                tables: 1,
                auto_tables: 0,
                binding_table_groups: 0,
                broadcast_tables: 1,
            }
        );
    }
}
