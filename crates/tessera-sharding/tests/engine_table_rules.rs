//! End-to-end tests for sharding table rule statements.

use tessera_distsql::segment::{
    AlgorithmSegment, AutoTableRuleSegment, KeyGenerateSegment, StrategySegment,
    TableRuleDefinition, TableRuleSegment,
};
use tessera_distsql::statement::{
    AlterShardingTableRule, CreateShardingTableRule, DropShardingTableRule, RuleStatement,
};
use tessera_sharding::engine::{self, ExecuteOutcome};
use tessera_sharding::query;
use tessera_sharding::{ShardingRuleConfig, ShardingRuleError};

const DB: &str = "sharding_db";

fn run(catalog: &mut Option<ShardingRuleConfig>, statement: RuleStatement) -> ExecuteOutcome {
    let outcome = engine::execute(DB, catalog.as_ref(), &statement).expect("statement rejected");
    *catalog = outcome.config.clone();
    outcome
}

fn auto_rule(table: &str, column: &str) -> TableRuleDefinition {
    TableRuleDefinition::Auto(
        AutoTableRuleSegment::new(table, vec!["ds_0".into(), "ds_1".into()])
            .with_sharding_column(column)
            .with_algorithm(AlgorithmSegment::new("HASH_MOD").with_prop("sharding-count", "4")),
    )
}

fn create(rules: Vec<TableRuleDefinition>) -> RuleStatement {
    RuleStatement::CreateShardingTableRule(CreateShardingTableRule {
        if_not_exists: false,
        rules,
    })
}

fn drop_tables(if_exists: bool, tables: &[&str]) -> RuleStatement {
    RuleStatement::DropShardingTableRule(DropShardingTableRule {
        if_exists,
        tables: tables.iter().map(|t| (*t).to_string()).collect(),
    })
}

#[test]
fn test_create_auto_table_registers_synthesized_algorithm() {
    let mut catalog = None;
    let outcome = run(&mut catalog, create(vec![auto_rule("t_order", "order_id")]));
    assert!(outcome.changed);
    assert!(!outcome.now_empty);

    let config = catalog.expect("catalog created");
    assert!(config.auto_tables.contains_key("t_order"));
    let algorithm = &config.sharding_algorithms["t_order_order_id_hash_mod"];
    assert_eq!(algorithm.algorithm_type, "HASH_MOD");
    assert!(query::unused_sharding_algorithms(&config).is_empty());
}

#[test]
fn test_create_explicit_table_with_inline_strategies() {
    let mut catalog = None;
    let rule = TableRuleDefinition::Table(
        TableRuleSegment::new(
            "t_order",
            vec!["ds_0.t_order_0".into(), "ds_1.t_order_1".into()],
        )
        .with_table_strategy(StrategySegment::inline(
            "STANDARD",
            Some("order_id"),
            AlgorithmSegment::new("INLINE")
                .with_prop("algorithm-expression", "t_order_${order_id % 2}"),
        ))
        .with_key_generate(KeyGenerateSegment::inline(
            "order_id",
            AlgorithmSegment::new("SNOWFLAKE"),
        )),
    );
    run(&mut catalog, create(vec![rule]));
    let config = catalog.unwrap();
    let table = &config.tables["t_order"];
    assert_eq!(
        table.table_strategy.as_ref().and_then(|s| s.algorithm_name()),
        Some("t_order_table_inline")
    );
    assert_eq!(
        table
            .key_generate_strategy
            .as_ref()
            .map(|s| s.key_generator_name.as_str()),
        Some("t_order_order_id")
    );
    assert!(config.sharding_algorithms.contains_key("t_order_table_inline"));
    assert!(config.key_generators.contains_key("t_order_order_id"));
}

#[test]
fn test_table_identity_is_case_insensitive() {
    let mut catalog = None;
    run(&mut catalog, create(vec![auto_rule("t_Order", "order_id")]));
    let outcome = run(&mut catalog, drop_tables(false, &["T_ORDER"]));
    assert!(outcome.changed);
    assert!(outcome.now_empty);
    assert!(catalog.unwrap().is_empty());
}

#[test]
fn test_drop_prunes_exclusively_used_algorithm_and_reports_empty() {
    let mut catalog = None;
    run(&mut catalog, create(vec![auto_rule("t_order", "order_id")]));
    let outcome = run(&mut catalog, drop_tables(false, &["t_order"]));
    assert!(outcome.now_empty);

    let dropped = outcome.dropped.expect("drop delta reported");
    assert_eq!(dropped.auto_tables.len(), 1);
    assert!(dropped
        .sharding_algorithms
        .contains_key("t_order_order_id_hash_mod"));

    let config = catalog.unwrap();
    assert!(config.sharding_algorithms.is_empty());
    assert!(config.is_empty());
}

#[test]
fn test_drop_keeps_algorithm_shared_with_surviving_table() {
    let mut catalog = None;
    run(
        &mut catalog,
        create(vec![
            auto_rule("t_order", "order_id"),
            auto_rule("t_order_item", "order_item_id"),
        ]),
    );
    run(&mut catalog, drop_tables(false, &["t_order"]));
    let config = catalog.unwrap();
    assert!(!config.sharding_algorithms.contains_key("t_order_order_id_hash_mod"));
    assert!(config
        .sharding_algorithms
        .contains_key("t_order_item_order_item_id_hash_mod"));
    assert!(query::unused_sharding_algorithms(&config).is_empty());
}

#[test]
fn test_failed_multi_table_statement_leaves_catalog_untouched() {
    let mut catalog = None;
    run(&mut catalog, create(vec![auto_rule("t_order", "order_id")]));
    let before = catalog.clone().unwrap();

    // Second rule collides, so the whole statement must be rejected.
    let err = engine::execute(
        DB,
        catalog.as_ref(),
        &create(vec![auto_rule("t_new", "id"), auto_rule("T_ORDER", "order_id")]),
    )
    .unwrap_err();
    match err {
        ShardingRuleError::DuplicateRule { names, .. } => {
            assert_eq!(names, ["T_ORDER".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(catalog.unwrap(), before);
}

#[test]
fn test_create_if_not_exists_with_full_collision_is_successful_noop() {
    let mut catalog = None;
    run(&mut catalog, create(vec![auto_rule("t_order", "order_id")]));
    let before = catalog.clone().unwrap();
    let outcome = run(
        &mut catalog,
        RuleStatement::CreateShardingTableRule(CreateShardingTableRule {
            if_not_exists: true,
            rules: vec![auto_rule("T_ORDER", "order_id")],
        }),
    );
    assert!(!outcome.changed);
    assert_eq!(catalog.unwrap(), before);
}

#[test]
fn test_drop_if_exists_on_absent_catalog_is_successful_noop() {
    let outcome = engine::execute(DB, None, &drop_tables(true, &["t_order"])).unwrap();
    assert!(!outcome.changed);
    assert!(outcome.config.is_none());
}

#[test]
fn test_drop_without_guard_requires_catalog_and_tables() {
    let err = engine::execute(DB, None, &drop_tables(false, &["t_order"])).unwrap_err();
    assert!(matches!(err, ShardingRuleError::MissingRequiredRule { .. }));

    let mut catalog = None;
    run(&mut catalog, create(vec![auto_rule("t_order", "order_id")]));
    let err = engine::execute(
        DB,
        catalog.as_ref(),
        &drop_tables(false, &["t_order", "t_missing"]),
    )
    .unwrap_err();
    match err {
        ShardingRuleError::MissingRequiredRule { names, .. } => {
            assert_eq!(names, ["t_missing".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_alter_replaces_strategy_and_prunes_orphaned_algorithm() {
    let mut catalog = None;
    run(&mut catalog, create(vec![auto_rule("t_order", "order_id")]));
    let outcome = run(
        &mut catalog,
        RuleStatement::AlterShardingTableRule(AlterShardingTableRule {
            rules: vec![TableRuleDefinition::Auto(
                AutoTableRuleSegment::new("t_order", vec!["ds_0".into()])
                    .with_sharding_column("order_id")
                    .with_algorithm(AlgorithmSegment::new("MOD").with_prop("sharding-count", "2")),
            )],
        }),
    );
    assert!(outcome.changed);
    let config = catalog.unwrap();
    let strategy = &config.auto_tables["t_order"].sharding_strategy;
    assert_eq!(strategy.algorithm_name(), Some("t_order_order_id_mod"));
    // The HASH_MOD registration from the create lost its only referrer.
    assert!(!config.sharding_algorithms.contains_key("t_order_order_id_hash_mod"));
    assert!(query::unused_sharding_algorithms(&config).is_empty());
}

#[test]
fn test_alter_unknown_table_is_rejected() {
    let mut catalog = None;
    run(&mut catalog, create(vec![auto_rule("t_order", "order_id")]));
    let err = engine::execute(
        DB,
        catalog.as_ref(),
        &RuleStatement::AlterShardingTableRule(AlterShardingTableRule {
            rules: vec![auto_rule("t_missing", "id")],
        }),
    )
    .unwrap_err();
    assert!(matches!(err, ShardingRuleError::MissingRequiredRule { .. }));
}
