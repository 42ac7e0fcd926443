//! Checkers for CREATE/ALTER/DROP SHARDING TABLE REFERENCE RULE.

use std::collections::BTreeMap;

use tessera_distsql::segment::TableReferenceRuleSegment;
use tessera_distsql::statement::{
    AlterShardingTableReferenceRule, CreateShardingTableReferenceRule,
    DropShardingTableReferenceRule,
};

use crate::config::ShardingRuleConfig;
use crate::error::{Result, ShardingRuleError};
use crate::name::{self, CaseInsensitiveSet};

use super::{
    check_group_compatibility, check_no_duplicates, require_catalog, StrategyOverrides,
};

const RULE_KIND: &str = "sharding table reference";

/// Validate `CREATE SHARDING TABLE REFERENCE RULE`.
pub fn check_create(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &CreateShardingTableReferenceRule,
) -> Result<()> {
    let empty = ShardingRuleConfig::default();
    let config = current.unwrap_or(&empty);
    check_no_duplicates(
        database,
        RULE_KIND,
        statement.rules.iter().map(|rule| rule.name.as_str()),
    )?;
    let existing = config.binding_group_names();
    if !statement.if_not_exists {
        let duplicated = name::intersection(
            statement.rules.iter().map(|rule| rule.name.as_str()),
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
    let to_create: Vec<&TableReferenceRuleSegment> = statement
        .rules
        .iter()
        .filter(|rule| !(statement.if_not_exists && existing.contains(&rule.name)))
        .collect();
    // Tables may not be referenced by any existing group.
    check_members(database, config, &to_create, &CaseInsensitiveSet::new())
}

/// Validate `ALTER SHARDING TABLE REFERENCE RULE`.
pub fn check_alter(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &AlterShardingTableReferenceRule,
) -> Result<()> {
    let config = require_catalog(database, current, RULE_KIND)?;
    check_no_duplicates(
        database,
        RULE_KIND,
        statement.rules.iter().map(|rule| rule.name.as_str()),
    )?;
    let missing = name::missing_from(
        statement.rules.iter().map(|rule| rule.name.as_str()),
        &config.binding_group_names(),
    );
    if !missing.is_empty() {
        return Err(ShardingRuleError::MissingRequiredRule {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: missing,
        });
    }
    // Members may re-appear in the groups this statement replaces.
    let replaced: CaseInsensitiveSet = statement
        .rules
        .iter()
        .map(|rule| rule.name.as_str())
        .collect();
    let rules: Vec<&TableReferenceRuleSegment> = statement.rules.iter().collect();
    check_members(database, config, &rules, &replaced)
}

/// Validate `DROP SHARDING TABLE REFERENCE RULE`.
pub fn check_drop(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &DropShardingTableReferenceRule,
) -> Result<()> {
    if statement.if_exists && current.is_none() {
        return Ok(());
    }
    let config = require_catalog(database, current, RULE_KIND)?;
    check_no_duplicates(database, RULE_KIND, statement.names.iter().map(String::as_str))?;
    if !statement.if_exists {
        let missing = name::missing_from(
            statement.names.iter().map(String::as_str),
            &config.binding_group_names(),
        );
        if !missing.is_empty() {
            return Err(ShardingRuleError::MissingRequiredRule {
                rule_kind: RULE_KIND.to_string(),
                database: database.to_string(),
                names: missing,
            });
        }
    }
    Ok(())
}

/// Shared member validation: every member must exist as a sharding table,
/// appear in only one group across the statement and the surviving catalog
/// groups, and shard compatibly with its peers.
fn check_members(
    database: &str,
    config: &ShardingRuleConfig,
    rules: &[&TableReferenceRuleSegment],
    replaced_groups: &CaseInsensitiveSet,
) -> Result<()> {
    let sharding_tables = config.logic_table_names();
    let mut missing = Vec::new();
    let mut conflicted = Vec::new();
    let mut seen = CaseInsensitiveSet::new();
    for rule in rules {
        for member in rule.member_tables() {
            if !sharding_tables.contains(member) {
                missing.push(member.to_string());
            }
            if !seen.insert(member) {
                conflicted.push(member.to_string());
                continue;
            }
            let bound_elsewhere = config
                .binding_group_containing(member)
                .is_some_and(|group| !replaced_groups.contains(&group.name));
            if bound_elsewhere {
                conflicted.push(member.to_string());
            }
        }
    }
    if !missing.is_empty() {
        return Err(ShardingRuleError::MissingRequiredRule {
            rule_kind: "sharding".to_string(),
            database: database.to_string(),
            names: missing,
        });
    }
    if !conflicted.is_empty() {
        return Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: conflicted,
            reason: "a table may belong to at most one reference rule".to_string(),
        });
    }
    for rule in rules {
        check_group_compatibility(
            database,
            config,
            &rule.name,
            &rule.member_tables(),
            &StrategyOverrides::new(),
            &BTreeMap::new(),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlgorithmConfig, StrategyConfig, TableRuleConfig};

    fn catalog_with_tables(tables: &[&str]) -> ShardingRuleConfig {
        let mut config = ShardingRuleConfig::new();
        config
            .sharding_algorithms
            .insert("shared_mod".into(), AlgorithmConfig::new("MOD").with_prop("sharding-count", "2"));
        for table in tables {
            config.tables.insert(
                table.to_lowercase(),
                TableRuleConfig::new(*table, vec![format!("ds_0.{table}_0")]).with_table_strategy(
                    StrategyConfig::Standard {
                        sharding_column: "id".into(),
                        algorithm_name: "shared_mod".into(),
                    },
                ),
            );
        }
        config
    }

    fn create_statement(name: &str, reference: &str) -> CreateShardingTableReferenceRule {
        CreateShardingTableReferenceRule {
            if_not_exists: false,
            rules: vec![TableReferenceRuleSegment::new(name, reference)],
        }
    }

    #[test]
    fn test_create_with_existing_tables() {
        let config = catalog_with_tables(&["t_order", "t_order_item"]);
        assert!(check_create(
            "db",
            Some(&config),
            &create_statement("ref_0", "t_order,t_order_item"),
        )
        .is_ok());
    }

    #[test]
    fn test_create_names_missing_tables() {
        let config = catalog_with_tables(&["t_order"]);
        let err = check_create(
            "db",
            Some(&config),
            &create_statement("ref_0", "t_order,t_missing"),
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
    fn test_create_rejects_member_already_in_a_group() {
        let mut config = catalog_with_tables(&["t_order", "t_order_item", "t_status"]);
        config.binding_table_groups.push(
            crate::config::TableReferenceRuleConfig::new("ref_0", "t_order,t_order_item"),
        );
        let err = check_create(
            "db",
            Some(&config),
            &create_statement("ref_1", "t_order,t_status"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ShardingRuleError::InvalidRuleConfiguration { .. }
        ));
    }

    #[test]
    fn test_alter_allows_members_of_the_replaced_group() {
        let mut config = catalog_with_tables(&["t_order", "t_order_item", "t_status"]);
        config.binding_table_groups.push(
            crate::config::TableReferenceRuleConfig::new("ref_0", "t_order,t_order_item"),
        );
        assert!(check_alter(
            "db",
            Some(&config),
            &AlterShardingTableReferenceRule {
                rules: vec![TableReferenceRuleSegment::new("ref_0", "t_order,t_status")],
            },
        )
        .is_ok());
    }

    #[test]
    fn test_alter_unknown_group() {
        let config = catalog_with_tables(&["t_order", "t_order_item"]);
        let err = check_alter(
            "db",
            Some(&config),
            &AlterShardingTableReferenceRule {
                rules: vec![TableReferenceRuleSegment::new("ref_9", "t_order,t_order_item")],
            },
        )
        .unwrap_err();
        assert!(matches!(err, ShardingRuleError::MissingRequiredRule { .. }));
    }

    #[test]
    fn test_drop_if_exists_tolerates_missing_names() {
        let config = catalog_with_tables(&[]);
        assert!(check_drop(
            "db",
            Some(&config),
            &DropShardingTableReferenceRule {
                if_exists: true,
                names: vec!["ref_0".into()],
            },
        )
        .is_ok());
        let err = check_drop(
            "db",
            Some(&config),
            &DropShardingTableReferenceRule {
                if_exists: false,
                names: vec!["ref_0".into()],
            },
        )
        .unwrap_err();
        assert!(matches!(err, ShardingRuleError::MissingRequiredRule { .. }));
    }
}
