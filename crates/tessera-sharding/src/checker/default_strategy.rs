//! Checkers for CREATE/ALTER/DROP DEFAULT SHARDING STRATEGY.

use std::collections::BTreeSet;

use tessera_distsql::statement::{
    AlterDefaultShardingStrategy, CreateDefaultShardingStrategy, DropDefaultShardingStrategy,
    StrategyScope,
};

use crate::builder::convert;
use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::error::{Result, ShardingRuleError};
use crate::scanner;

use super::{check_declared_name_collisions, check_strategy_segment, require_catalog};

fn rule_kind(scope: StrategyScope) -> String {
    format!("default {} sharding strategy", scope.label())
}

fn current_default(config: &ShardingRuleConfig, scope: StrategyScope) -> bool {
    match scope {
        StrategyScope::Database => config.default_database_strategy.is_some(),
        StrategyScope::Table => config.default_table_strategy.is_some(),
    }
}

fn pseudo_referrer(scope: StrategyScope) -> &'static str {
    match scope {
        StrategyScope::Database => scanner::DEFAULT_DATABASE_STRATEGY,
        StrategyScope::Table => scanner::DEFAULT_TABLE_STRATEGY,
    }
}

/// Validate `CREATE DEFAULT SHARDING DATABASE|TABLE STRATEGY`.
pub fn check_create(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &CreateDefaultShardingStrategy,
) -> Result<()> {
    let empty = ShardingRuleConfig::default();
    let config = current.unwrap_or(&empty);
    if current_default(config, statement.scope) {
        // Re-creating an existing default is a no-op only under the guard.
        return if statement.if_not_exists {
            Ok(())
        } else {
            Err(ShardingRuleError::DuplicateRule {
                rule_kind: rule_kind(statement.scope),
                database: database.to_string(),
                names: vec![statement.scope.label().to_string()],
            })
        };
    }
    let owner = rule_kind(statement.scope);
    check_strategy_segment(database, config, &statement.strategy, &owner)?;
    check_declared_collision(database, config, statement.scope, statement, &BTreeSet::new())
}

/// Validate `ALTER DEFAULT SHARDING DATABASE|TABLE STRATEGY`.
pub fn check_alter(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &AlterDefaultShardingStrategy,
) -> Result<()> {
    let config = require_catalog(database, current, &rule_kind(statement.scope))?;
    if !current_default(config, statement.scope) {
        return Err(ShardingRuleError::MissingRequiredRule {
            rule_kind: rule_kind(statement.scope),
            database: database.to_string(),
            names: vec![statement.scope.label().to_string()],
        });
    }
    let owner = rule_kind(statement.scope);
    check_strategy_segment(database, config, &statement.strategy, &owner)?;
    // The previous default's synthesized algorithm may be overwritten.
    let replaced = BTreeSet::from([pseudo_referrer(statement.scope).to_string()]);
    let create_like = CreateDefaultShardingStrategy {
        if_not_exists: false,
        scope: statement.scope,
        strategy: statement.strategy.clone(),
    };
    check_declared_collision(database, config, statement.scope, &create_like, &replaced)
}

/// Validate `DROP DEFAULT SHARDING DATABASE|TABLE STRATEGY`.
pub fn check_drop(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &DropDefaultShardingStrategy,
) -> Result<()> {
    if statement.if_exists && current.is_none() {
        return Ok(());
    }
    let config = require_catalog(database, current, &rule_kind(statement.scope))?;
    if !current_default(config, statement.scope) && !statement.if_exists {
        return Err(ShardingRuleError::MissingRequiredRule {
            rule_kind: rule_kind(statement.scope),
            database: database.to_string(),
            names: vec![statement.scope.label().to_string()],
        });
    }
    Ok(())
}

fn check_declared_collision(
    database: &str,
    config: &ShardingRuleConfig,
    scope: StrategyScope,
    statement: &CreateDefaultShardingStrategy,
    replaced: &BTreeSet<String>,
) -> Result<()> {
    let Some(algorithm) = &statement.strategy.algorithm else {
        return Ok(());
    };
    let declared = vec![(
        AlgorithmCategory::Sharding,
        convert::strategy_algorithm_name(None, scope, &algorithm.type_name),
    )];
    check_declared_name_collisions(database, config, &rule_kind(scope), &declared, replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrategyConfig;
    use tessera_distsql::segment::{AlgorithmSegment, StrategySegment};

    fn standard_inline() -> StrategySegment {
        StrategySegment::inline(
            "STANDARD",
            Some("order_id"),
            AlgorithmSegment::new("MOD").with_prop("sharding-count", "4"),
        )
    }

    #[test]
    fn test_create_over_existing_default_is_duplicate() {
        let mut config = ShardingRuleConfig::new();
        config.default_table_strategy = Some(StrategyConfig::None);
        let statement = CreateDefaultShardingStrategy {
            if_not_exists: false,
            scope: StrategyScope::Table,
            strategy: standard_inline(),
        };
        let err = check_create("db", Some(&config), &statement).unwrap_err();
        assert!(matches!(err, ShardingRuleError::DuplicateRule { .. }));

        let guarded = CreateDefaultShardingStrategy {
            if_not_exists: true,
            ..statement
        };
        assert!(check_create("db", Some(&config), &guarded).is_ok());
    }

    #[test]
    fn test_create_none_strategy_on_absent_catalog() {
        let statement = CreateDefaultShardingStrategy {
            if_not_exists: false,
            scope: StrategyScope::Table,
            strategy: StrategySegment::none(),
        };
        assert!(check_create("db", None, &statement).is_ok());
    }

    #[test]
    fn test_alter_requires_existing_default() {
        let config = ShardingRuleConfig::new();
        let err = check_alter(
            "db",
            Some(&config),
            &AlterDefaultShardingStrategy {
                scope: StrategyScope::Database,
                strategy: standard_inline(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, ShardingRuleError::MissingRequiredRule { .. }));
    }

    #[test]
    fn test_drop_respects_if_exists() {
        let config = ShardingRuleConfig::new();
        assert!(check_drop(
            "db",
            Some(&config),
            &DropDefaultShardingStrategy {
                if_exists: true,
                scope: StrategyScope::Table,
            },
        )
        .is_ok());
        let err = check_drop(
            "db",
            Some(&config),
            &DropDefaultShardingStrategy {
                if_exists: false,
                scope: StrategyScope::Table,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ShardingRuleError::MissingRequiredRule { .. }));
    }
}
