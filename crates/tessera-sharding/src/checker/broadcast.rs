//! Checkers for CREATE/ALTER/DROP BROADCAST TABLE RULE.

use tessera_distsql::statement::{
    AlterBroadcastTableRule, CreateBroadcastTableRule, DropBroadcastTableRule,
};

use crate::config::ShardingRuleConfig;
use crate::error::{Result, ShardingRuleError};
use crate::name::{self, CaseInsensitiveSet};

use super::{check_no_duplicates, require_catalog};

const RULE_KIND: &str = "broadcast";

/// Validate `CREATE BROADCAST TABLE RULE`.
pub fn check_create(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &CreateBroadcastTableRule,
) -> Result<()> {
    check_no_duplicates(database, RULE_KIND, statement.tables.iter().map(String::as_str))?;
    if statement.if_not_exists {
        return Ok(());
    }
    let existing: CaseInsensitiveSet = current
        .map(|config| config.broadcast_tables.iter().map(String::as_str).collect())
        .unwrap_or_default();
    let duplicated = name::intersection(statement.tables.iter().map(String::as_str), &existing);
    if duplicated.is_empty() {
        Ok(())
    } else {
        Err(ShardingRuleError::DuplicateRule {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: duplicated,
        })
    }
}

/// Validate `ALTER BROADCAST TABLE RULE` (wholesale replacement of the set).
pub fn check_alter(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &AlterBroadcastTableRule,
) -> Result<()> {
    require_catalog(database, current, RULE_KIND)?;
    if statement.tables.is_empty() {
        return Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: RULE_KIND.to_string(),
            database: database.to_string(),
            names: Vec::new(),
            reason: "a broadcast table rule requires at least one table".to_string(),
        });
    }
    check_no_duplicates(database, RULE_KIND, statement.tables.iter().map(String::as_str))
}

/// Validate `DROP BROADCAST TABLE RULE`.
pub fn check_drop(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &DropBroadcastTableRule,
) -> Result<()> {
    if statement.if_exists && current.is_none() {
        return Ok(());
    }
    let config = require_catalog(database, current, RULE_KIND)?;
    check_no_duplicates(database, RULE_KIND, statement.tables.iter().map(String::as_str))?;
    if !statement.if_exists {
        let existing: CaseInsensitiveSet = config
            .broadcast_tables
            .iter()
            .map(String::as_str)
            .collect();
        let missing = name::missing_from(statement.tables.iter().map(String::as_str), &existing);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_broadcast(tables: &[&str]) -> ShardingRuleConfig {
        let mut config = ShardingRuleConfig::new();
        for table in tables {
            config.broadcast_tables.insert(table.to_lowercase());
        }
        config
    }

    #[test]
    fn test_create_collision_is_case_insensitive() {
        let config = catalog_with_broadcast(&["t_dict"]);
        let statement = CreateBroadcastTableRule {
            if_not_exists: false,
            tables: vec!["T_DICT".into()],
        };
        let err = check_create("db", Some(&config), &statement).unwrap_err();
        assert!(matches!(err, ShardingRuleError::DuplicateRule { .. }));
        let guarded = CreateBroadcastTableRule {
            if_not_exists: true,
            tables: vec!["T_DICT".into()],
        };
        assert!(check_create("db", Some(&config), &guarded).is_ok());
    }

    #[test]
    fn test_alter_requires_catalog_and_tables() {
        let statement = AlterBroadcastTableRule {
            tables: vec!["t_dict".into()],
        };
        assert!(check_alter("db", None, &statement).is_err());
        let config = catalog_with_broadcast(&["t_dict"]);
        assert!(check_alter("db", Some(&config), &statement).is_ok());
        let empty = AlterBroadcastTableRule { tables: vec![] };
        assert!(matches!(
            check_alter("db", Some(&config), &empty).unwrap_err(),
            ShardingRuleError::InvalidRuleConfiguration { .. }
        ));
    }

    #[test]
    fn test_drop_missing_table() {
        let config = catalog_with_broadcast(&["t_dict"]);
        let err = check_drop(
            "db",
            Some(&config),
            &DropBroadcastTableRule {
                if_exists: false,
                tables: vec!["t_other".into()],
            },
        )
        .unwrap_err();
        assert!(matches!(err, ShardingRuleError::MissingRequiredRule { .. }));
    }
}
