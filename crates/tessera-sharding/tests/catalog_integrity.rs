//! Cross-cutting catalog invariants: reference integrity of the result of
//! every successful mutation, orphan sweeping, and serialization.

use tessera_distsql::segment::{
    AlgorithmSegment, AutoTableRuleSegment, NamedAlgorithmSegment, TableReferenceRuleSegment,
    TableRuleDefinition,
};
use tessera_distsql::statement::{
    CreateShardingAlgorithm, CreateShardingTableReferenceRule, CreateShardingTableRule,
    DropShardingTableRule, RuleStatement,
};
use tessera_sharding::config::AlgorithmCategory;
use tessera_sharding::engine;
use tessera_sharding::{scanner, ShardingRuleConfig};

const DB: &str = "integrity_db";

fn auto_rule(table: &str) -> TableRuleDefinition {
    TableRuleDefinition::Auto(
        AutoTableRuleSegment::new(table, vec!["ds_0".into(), "ds_1".into()])
            .with_sharding_column("id")
            .with_algorithm(AlgorithmSegment::new("HASH_MOD").with_prop("sharding-count", "4")),
    )
}

fn assert_referentially_closed(config: &ShardingRuleConfig) {
    for category in [
        AlgorithmCategory::Sharding,
        AlgorithmCategory::KeyGenerator,
        AlgorithmCategory::Auditor,
    ] {
        for used in scanner::used_names(config, category) {
            assert!(
                config.registry(category).contains_key(&used),
                "{category:?} registry is missing referenced entry `{used}`"
            );
        }
    }
    for group in &config.binding_table_groups {
        for member in group.member_tables() {
            assert!(
                config.contains_logic_table(member),
                "group `{}` references unknown table `{member}`",
                group.name
            );
        }
    }
}

/// Every catalog produced by a sequence of successful statements references
/// only entries that exist.
#[test]
fn test_every_intermediate_catalog_is_referentially_closed() {
    let statements = vec![
        RuleStatement::CreateShardingTableRule(CreateShardingTableRule {
            if_not_exists: false,
            rules: vec![auto_rule("t_order"), auto_rule("t_order_item")],
        }),
        RuleStatement::CreateShardingAlgorithm(CreateShardingAlgorithm {
            if_not_exists: false,
            algorithms: vec![NamedAlgorithmSegment::new(
                "standalone_mod",
                AlgorithmSegment::new("MOD").with_prop("sharding-count", "2"),
            )],
        }),
        RuleStatement::CreateShardingTableReferenceRule(CreateShardingTableReferenceRule {
            if_not_exists: false,
            rules: vec![TableReferenceRuleSegment::new(
                "ref_order",
                "t_order,t_order_item",
            )],
        }),
        RuleStatement::DropShardingTableRule(DropShardingTableRule {
            if_exists: false,
            tables: vec!["t_order_item".into()],
        }),
    ];

    let mut catalog: Option<ShardingRuleConfig> = None;
    for statement in &statements {
        // The reference rule blocks dropping a member table.
        let outcome = match engine::execute(DB, catalog.as_ref(), statement) {
            Ok(outcome) => outcome,
            Err(_) => continue,
        };
        catalog = outcome.config;
        if let Some(config) = catalog.as_ref() {
            assert_referentially_closed(config);
        }
    }
}

/// A referrer-removing statement sweeps every orphan, including ones left by
/// earlier registry-only statements.
#[test]
fn test_gc_sweeps_orphans_left_by_earlier_statements() {
    let mut catalog: Option<ShardingRuleConfig> = None;
    let outcome = engine::execute(
        DB,
        catalog.as_ref(),
        &RuleStatement::CreateShardingTableRule(CreateShardingTableRule {
            if_not_exists: false,
            rules: vec![auto_rule("t_order"), auto_rule("t_keep")],
        }),
    )
    .unwrap();
    catalog = outcome.config;

    // A registry create leaves an unreferenced entry in place.
    let outcome = engine::execute(
        DB,
        catalog.as_ref(),
        &RuleStatement::CreateShardingAlgorithm(CreateShardingAlgorithm {
            if_not_exists: false,
            algorithms: vec![NamedAlgorithmSegment::new(
                "standalone_mod",
                AlgorithmSegment::new("MOD").with_prop("sharding-count", "2"),
            )],
        }),
    )
    .unwrap();
    catalog = outcome.config;
    let config = catalog.as_ref().unwrap();
    assert!(config.sharding_algorithms.contains_key("standalone_mod"));

    // The next table drop prunes both the dropped table's synthesized
    // algorithm and the standalone entry.
    let outcome = engine::execute(
        DB,
        catalog.as_ref(),
        &RuleStatement::DropShardingTableRule(DropShardingTableRule {
            if_exists: false,
            tables: vec!["t_order".into()],
        }),
    )
    .unwrap();
    let config = outcome.config.unwrap();
    assert!(!config.sharding_algorithms.contains_key("standalone_mod"));
    assert!(!config.sharding_algorithms.contains_key("t_order_id_hash_mod"));
    assert!(config.sharding_algorithms.contains_key("t_keep_id_hash_mod"));
    assert!(scanner::unused_names(&config, AlgorithmCategory::Sharding).is_empty());
}

#[test]
fn test_catalog_survives_json_round_trip() {
    let mut catalog: Option<ShardingRuleConfig> = None;
    let outcome = engine::execute(
        DB,
        catalog.as_ref(),
        &RuleStatement::CreateShardingTableRule(CreateShardingTableRule {
            if_not_exists: false,
            rules: vec![auto_rule("t_order")],
        }),
    )
    .unwrap();
    catalog = outcome.config;
    let outcome = engine::execute(
        DB,
        catalog.as_ref(),
        &RuleStatement::CreateShardingTableReferenceRule(CreateShardingTableReferenceRule {
            if_not_exists: false,
            rules: vec![TableReferenceRuleSegment::new("ref_solo", "t_order")],
        }),
    );
    // Single-member groups are invalid; keep the single-table catalog.
    assert!(outcome.is_err());

    let config = catalog.unwrap();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let restored: ShardingRuleConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, restored);
}
