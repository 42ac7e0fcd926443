//! Delta builders for sharding table rule statements.

use tessera_distsql::segment::TableRuleDefinition;
use tessera_distsql::statement::{
    AlterShardingTableRule, CreateShardingTableRule, DropShardingTableRule,
};

use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::delta::{DeltaMode, RuleDelta};
use crate::scanner;

use super::convert;

/// Build the fragment a `CREATE SHARDING TABLE RULE` adds. Under
/// `IF NOT EXISTS`, rules whose table already exists are filtered out here,
/// so the mutator only ever union-merges.
pub fn build_created(
    config: &ShardingRuleConfig,
    statement: &CreateShardingTableRule,
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Created);
    for rule in &statement.rules {
        if statement.if_not_exists && config.contains_logic_table(rule.table()) {
            continue;
        }
        push_rule(rule, &mut delta);
    }
    delta
}

/// Build the fragment an `ALTER SHARDING TABLE RULE` replaces. Replaced
/// strategies may orphan registry entries, so the mutator runs GC afterwards.
pub fn build_altered(statement: &AlterShardingTableRule) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Altered);
    delta.prune_unused = true;
    for rule in &statement.rules {
        push_rule(rule, &mut delta);
    }
    delta
}

/// Build the fragment a `DROP SHARDING TABLE RULE` removes: the current
/// values of the dropped rules plus every registry entry left without a
/// referrer once they are gone.
pub fn build_dropped(config: &ShardingRuleConfig, statement: &DropShardingTableRule) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Dropped);
    delta.prune_unused = true;
    let mut stripped = config.clone();
    for table in &statement.tables {
        let key = table.to_lowercase();
        if let Some(rule) = stripped.tables.remove(&key) {
            delta.tables.push(rule);
        }
        if let Some(rule) = stripped.auto_tables.remove(&key) {
            delta.auto_tables.push(rule);
        }
    }
    capture_orphans(config, &stripped, &mut delta);
    delta
}

fn push_rule(rule: &TableRuleDefinition, delta: &mut RuleDelta) {
    match rule {
        TableRuleDefinition::Table(segment) => {
            let table = convert::convert_table_rule(segment, delta);
            delta.tables.push(table);
        }
        TableRuleDefinition::Auto(segment) => {
            let table = convert::convert_auto_table_rule(segment, delta);
            delta.auto_tables.push(table);
        }
    }
}

/// Record, per registry, the entries that have no referrer in `stripped`
/// (the catalog with the dropped constituents already removed). These are the
/// entries GC will prune, captured so callers can release their resources.
pub(crate) fn capture_orphans(
    config: &ShardingRuleConfig,
    stripped: &ShardingRuleConfig,
    delta: &mut RuleDelta,
) {
    for category in [
        AlgorithmCategory::Sharding,
        AlgorithmCategory::KeyGenerator,
        AlgorithmCategory::Auditor,
    ] {
        for name in scanner::unused_names(stripped, category) {
            if let Some(algorithm) = config.registry(category).get(&name) {
                delta.registry_mut(category).insert(name, algorithm.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlgorithmConfig, AutoTableRuleConfig, StrategyConfig};
    use tessera_distsql::segment::{AlgorithmSegment, AutoTableRuleSegment};

    fn auto_rule(table: &str) -> TableRuleDefinition {
        TableRuleDefinition::Auto(
            AutoTableRuleSegment::new(table, vec!["ds_0".into()])
                .with_sharding_column("order_id")
                .with_algorithm(AlgorithmSegment::new("HASH_MOD").with_prop("sharding-count", "4")),
        )
    }

    #[test]
    fn test_build_created_registers_synthesized_algorithm() {
        let config = ShardingRuleConfig::new();
        let delta = build_created(
            &config,
            &CreateShardingTableRule {
                if_not_exists: false,
                rules: vec![auto_rule("t_order")],
            },
        );
        assert_eq!(delta.auto_tables.len(), 1);
        assert!(delta
            .sharding_algorithms
            .contains_key("t_order_order_id_hash_mod"));
        assert!(!delta.prune_unused);
    }

    #[test]
    fn test_build_created_filters_colliding_rules_under_guard() {
        let mut config = ShardingRuleConfig::new();
        config.auto_tables.insert(
            "t_order".into(),
            AutoTableRuleConfig::new(
                "t_order",
                vec!["ds_0".into()],
                StrategyConfig::Standard {
                    sharding_column: "order_id".into(),
                    algorithm_name: "t_order_order_id_hash_mod".into(),
                },
            ),
        );
        let delta = build_created(
            &config,
            &CreateShardingTableRule {
                if_not_exists: true,
                rules: vec![auto_rule("T_ORDER")],
            },
        );
        assert!(delta.is_noop());
    }

    #[test]
    fn test_build_dropped_captures_rule_and_orphans() {
        let mut config = ShardingRuleConfig::new();
        config.auto_tables.insert(
            "t_order".into(),
            AutoTableRuleConfig::new(
                "t_order",
                vec!["ds_0".into()],
                StrategyConfig::Standard {
                    sharding_column: "order_id".into(),
                    algorithm_name: "algo_a".into(),
                },
            ),
        );
        config
            .sharding_algorithms
            .insert("algo_a".into(), AlgorithmConfig::new("HASH_MOD"));
        let delta = build_dropped(
            &config,
            &DropShardingTableRule {
                if_exists: false,
                tables: vec!["T_ORDER".into()],
            },
        );
        assert_eq!(delta.auto_tables.len(), 1);
        assert!(delta.sharding_algorithms.contains_key("algo_a"));
        assert!(delta.prune_unused);
    }
}
