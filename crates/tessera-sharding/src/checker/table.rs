//! Checkers for CREATE/ALTER/DROP SHARDING TABLE RULE.

use std::collections::BTreeSet;

use tessera_distsql::segment::{AutoTableRuleSegment, TableRuleDefinition, TableRuleSegment};
use tessera_distsql::statement::{
    AlterShardingTableRule, CreateShardingTableRule, DropShardingTableRule, StrategyScope,
};

use crate::builder::convert;
use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::delta::{DeltaMode, RuleDelta};
use crate::error::{Result, ShardingRuleError};
use crate::name;
use crate::plugin;

use super::{
    check_audit_segment, check_declared_name_collisions, check_group_compatibility,
    check_key_generate_segment, check_no_duplicates, check_strategy_segment, require_catalog,
    StrategyOverrides,
};

const RULE_KIND: &str = "sharding";

/// Validate `CREATE SHARDING TABLE RULE`.
pub fn check_create(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &CreateShardingTableRule,
) -> Result<()> {
    let empty = ShardingRuleConfig::default();
    let config = current.unwrap_or(&empty);
    check_no_duplicates(
        database,
        RULE_KIND,
        statement.rules.iter().map(TableRuleDefinition::table),
    )?;
    let existing = config.logic_table_names();
    if !statement.if_not_exists {
        let duplicated = name::intersection(
            statement.rules.iter().map(TableRuleDefinition::table),
            &existing,
        );
        if !duplicated.is_empty() {
            return Err(ShardingRuleError::DuplicateRule {
                rule_kind: RULE_KIND.to_string(),
                database: database.to_string(),
                names: duplicated,
            });
        }
    }
    // With IF NOT EXISTS, colliding rules become no-ops and are not validated.
    let mut declared = Vec::new();
    for rule in &statement.rules {
        if statement.if_not_exists && existing.contains(rule.table()) {
            continue;
        }
        check_rule_definition(database, config, rule)?;
        declared.extend(convert::declared_names(rule));
    }
    check_declared_name_collisions(database, config, RULE_KIND, &declared, &BTreeSet::new())
}

/// Validate `ALTER SHARDING TABLE RULE`.
pub fn check_alter(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &AlterShardingTableRule,
) -> Result<()> {
    let config = require_catalog(database, current, RULE_KIND)?;
    check_no_duplicates(
        database,
        RULE_KIND,
        statement.rules.iter().map(TableRuleDefinition::table),
    )?;
    let missing = name::missing_from(
        statement.rules.iter().map(TableRuleDefinition::table),
        &config.logic_table_names(),
    );
    if !missing.is_empty() {
        return Err(ShardingRuleError::MissingRequiredRule {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: missing,
        });
    }
    let mut declared = Vec::new();
    for rule in &statement.rules {
        check_rule_definition(database, config, rule)?;
        declared.extend(convert::declared_names(rule));
    }
    let replaced: BTreeSet<String> = statement
        .rules
        .iter()
        .map(|rule| rule.table().to_lowercase())
        .collect();
    check_declared_name_collisions(database, config, RULE_KIND, &declared, &replaced)?;
    check_binding_groups_after_alter(database, config, statement)
}

/// Validate `DROP SHARDING TABLE RULE`.
pub fn check_drop(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &DropShardingTableRule,
) -> Result<()> {
    if statement.if_exists && current.is_none() {
        return Ok(());
    }
    let config = require_catalog(database, current, RULE_KIND)?;
    check_no_duplicates(database, RULE_KIND, statement.tables.iter().map(String::as_str))?;
    if !statement.if_exists {
        let missing = name::missing_from(
            statement.tables.iter().map(String::as_str),
            &config.logic_table_names(),
        );
        if !missing.is_empty() {
            return Err(ShardingRuleError::MissingRequiredRule {
                rule_kind: RULE_KIND.to_string(),
                database: database.to_string(),
                names: missing,
            });
        }
    }
    // A table bound into a reference group must leave the group first.
    let in_use: Vec<String> = statement
        .tables
        .iter()
        .filter(|table| config.binding_group_containing(table).is_some())
        .cloned()
        .collect();
    if !in_use.is_empty() {
        return Err(ShardingRuleError::RuleInUsed {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: in_use,
        });
    }
    Ok(())
}

fn check_rule_definition(
    database: &str,
    config: &ShardingRuleConfig,
    rule: &TableRuleDefinition,
) -> Result<()> {
    match rule {
        TableRuleDefinition::Table(segment) => check_table_segment(database, config, segment),
        TableRuleDefinition::Auto(segment) => check_auto_table_segment(database, config, segment),
    }
}

fn check_table_segment(
    database: &str,
    config: &ShardingRuleConfig,
    segment: &TableRuleSegment,
) -> Result<()> {
    if segment.data_nodes.is_empty() {
        return Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: vec![segment.table.clone()],
            reason: "a sharding table rule requires at least one data node".to_string(),
        });
    }
    if let Some(strategy) = &segment.database_strategy {
        check_strategy_segment(database, config, strategy, &segment.table)?;
    }
    if let Some(strategy) = &segment.table_strategy {
        check_strategy_segment(database, config, strategy, &segment.table)?;
    }
    if let Some(key_generate) = &segment.key_generate {
        check_key_generate_segment(database, config, key_generate, &segment.table)?;
    }
    if let Some(audit) = &segment.audit {
        check_audit_segment(database, audit)?;
    }
    Ok(())
}

fn check_auto_table_segment(
    database: &str,
    config: &ShardingRuleConfig,
    segment: &AutoTableRuleSegment,
) -> Result<()> {
    if segment.storage_units.is_empty() {
        return Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: vec![segment.table.clone()],
            reason: "a sharding auto table rule requires at least one storage unit".to_string(),
        });
    }
    if segment.sharding_column.is_none() {
        return Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: vec![segment.table.clone()],
            reason: "a sharding auto table rule requires a sharding column".to_string(),
        });
    }
    match (&segment.algorithm_name, &segment.algorithm) {
        (Some(algorithm_name), None) => {
            let Some(registered) = config.sharding_algorithms.get(algorithm_name) else {
                return Err(ShardingRuleError::MissingRequiredAlgorithm {
                    rule_kind: AlgorithmCategory::Sharding.to_string(),
                    database: database.to_string(),
                    names: vec![algorithm_name.clone()],
                });
            };
            require_auto_table_capable(database, &registered.algorithm_type)?;
        }
        (None, Some(algorithm)) => {
            plugin::check(
                database,
                AlgorithmCategory::Sharding,
                &algorithm.type_name,
                &algorithm.props,
            )?;
            require_auto_table_capable(database, &algorithm.type_name)?;
        }
        _ => {
            return Err(ShardingRuleError::InvalidAlgorithmConfiguration {
                rule_kind: RULE_KIND.to_string(),
                database: database.to_string(),
                names: vec![segment.table.clone()],
                reason: "a sharding auto table rule requires exactly one sharding algorithm"
                    .to_string(),
            });
        }
    }
    if let Some(key_generate) = &segment.key_generate {
        check_key_generate_segment(database, config, key_generate, &segment.table)?;
    }
    if let Some(audit) = &segment.audit {
        check_audit_segment(database, audit)?;
    }
    Ok(())
}

fn require_auto_table_capable(database: &str, type_name: &str) -> Result<()> {
    let auto_capable = plugin::find(AlgorithmCategory::Sharding, type_name)
        .map(|spec| spec.auto_table)
        .unwrap_or(false);
    if auto_capable {
        Ok(())
    } else {
        Err(ShardingRuleError::InvalidAlgorithmConfiguration {
            rule_kind: AlgorithmCategory::Sharding.to_string(),
            database: database.to_string(),
            names: vec![type_name.to_string()],
            reason: format!("algorithm type `{type_name}` cannot derive an auto table's shards"),
        })
    }
}

/// Altering a table that belongs to a reference group must keep the group
/// compatible; validated against the proposed strategies, never the catalog.
fn check_binding_groups_after_alter(
    database: &str,
    config: &ShardingRuleConfig,
    statement: &AlterShardingTableRule,
) -> Result<()> {
    let mut overrides = StrategyOverrides::new();
    let mut scratch = RuleDelta::new(DeltaMode::Altered);
    for rule in &statement.rules {
        let key = rule.table().to_lowercase();
        let strategies = match rule {
            TableRuleDefinition::Table(segment) => (
                segment.database_strategy.as_ref().map(|strategy| {
                    convert::convert_strategy(
                        Some(&segment.table),
                        StrategyScope::Database,
                        strategy,
                        &mut scratch,
                    )
                }),
                segment.table_strategy.as_ref().map(|strategy| {
                    convert::convert_strategy(
                        Some(&segment.table),
                        StrategyScope::Table,
                        strategy,
                        &mut scratch,
                    )
                }),
            ),
            TableRuleDefinition::Auto(segment) => (
                None,
                Some(convert::convert_auto_table_strategy(segment, &mut scratch)),
            ),
        };
        overrides.insert(key, strategies);
    }
    for group in &config.binding_table_groups {
        let members = group.member_tables();
        let affected = members
            .iter()
            .any(|member| overrides.contains_key(&member.to_lowercase()));
        if affected {
            check_group_compatibility(
                database,
                config,
                &group.name,
                &members,
                &overrides,
                &scratch.sharding_algorithms,
            )?;
        }
    }
    Ok(())
}
