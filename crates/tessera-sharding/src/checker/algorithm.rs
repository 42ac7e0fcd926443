//! Checkers for CREATE/ALTER/DROP of named registry resources: sharding
//! algorithms, key generators, and auditors. The three registries share one
//! set of rules, parameterized by [`AlgorithmCategory`].
//!
//! Registry names are case-sensitive (invariant: two names differing only in
//! case are distinct entries), but declaring the same name twice in one
//! statement is rejected ignoring case.

use tessera_distsql::segment::NamedAlgorithmSegment;

use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::error::{Result, ShardingRuleError};
use crate::plugin;
use crate::scanner;

use super::{check_no_duplicates, require_catalog};

/// Validate `CREATE SHARDING ALGORITHM|KEY GENERATOR|AUDITOR`.
pub fn check_create(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    category: AlgorithmCategory,
    if_not_exists: bool,
    algorithms: &[NamedAlgorithmSegment],
) -> Result<()> {
    let empty = ShardingRuleConfig::default();
    let config = current.unwrap_or(&empty);
    check_no_duplicates(
        database,
        &category.to_string(),
        algorithms.iter().map(|algorithm| algorithm.name.as_str()),
    )?;
    let registry = config.registry(category);
    if !if_not_exists {
        let duplicated: Vec<String> = algorithms
            .iter()
            .filter(|algorithm| registry.contains_key(&algorithm.name))
            .map(|algorithm| algorithm.name.clone())
            .collect();
        if !duplicated.is_empty() {
            return Err(ShardingRuleError::DuplicateRule {
                rule_kind: category.to_string(),
                database: database.to_string(),
                names: duplicated,
            });
        }
    }
    for algorithm in algorithms {
        if if_not_exists && registry.contains_key(&algorithm.name) {
            continue;
        }
        plugin::check(
            database,
            category,
            &algorithm.algorithm.type_name,
            &algorithm.algorithm.props,
        )?;
    }
    Ok(())
}

/// Validate `ALTER SHARDING ALGORITHM|KEY GENERATOR|AUDITOR`.
pub fn check_alter(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    category: AlgorithmCategory,
    algorithms: &[NamedAlgorithmSegment],
) -> Result<()> {
    let config = require_catalog(database, current, "sharding")?;
    check_no_duplicates(
        database,
        &category.to_string(),
        algorithms.iter().map(|algorithm| algorithm.name.as_str()),
    )?;
    let registry = config.registry(category);
    let missing: Vec<String> = algorithms
        .iter()
        .filter(|algorithm| !registry.contains_key(&algorithm.name))
        .map(|algorithm| algorithm.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ShardingRuleError::MissingRequiredAlgorithm {
            rule_kind: category.to_string(),
            database: database.to_string(),
            names: missing,
        });
    }
    for algorithm in algorithms {
        plugin::check(
            database,
            category,
            &algorithm.algorithm.type_name,
            &algorithm.algorithm.props,
        )?;
    }
    Ok(())
}

/// Validate `DROP SHARDING ALGORITHM|KEY GENERATOR|AUDITOR`.
pub fn check_drop(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    category: AlgorithmCategory,
    if_exists: bool,
    names: &[String],
) -> Result<()> {
    if if_exists && current.is_none() {
        return Ok(());
    }
    let config = require_catalog(database, current, "sharding")?;
    check_no_duplicates(
        database,
        &category.to_string(),
        names.iter().map(String::as_str),
    )?;
    let registry = config.registry(category);
    if !if_exists {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !registry.contains_key(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ShardingRuleError::MissingRequiredAlgorithm {
                rule_kind: category.to_string(),
                database: database.to_string(),
                names: missing,
            });
        }
    }
    let used = scanner::used_names(config, category);
    let in_use: Vec<String> = names
        .iter()
        .filter(|name| registry.contains_key(*name) && used.contains(*name))
        .cloned()
        .collect();
    if !in_use.is_empty() {
        return Err(ShardingRuleError::AlgorithmInUsed {
            rule_kind: category.to_string(),
            database: database.to_string(),
            names: in_use,
        });
    }
    Ok(())
}
