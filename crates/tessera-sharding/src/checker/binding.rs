//! Binding-group compatibility.
//!
//! Tables in one reference group must shard in lockstep. Compatibility is
//! decided on a normalized fingerprint of each member's effective database
//! and table strategies: strategy kind, algorithm type, and algorithm
//! properties with the member's own table name and sharding columns replaced
//! by placeholders. `t_order` with `t_order_${order_id % 2}` and
//! `t_order_item` with `t_order_item_${order_item_id % 2}` normalize to the
//! same fingerprint.

use std::collections::BTreeMap;

use crate::config::{AlgorithmConfig, ShardingRuleConfig, StrategyConfig};
use crate::error::{Result, ShardingRuleError};
use crate::name;

/// Proposed strategies for tables being altered by the same statement, keyed
/// by lowercase table name: `(database strategy, table strategy)`.
pub(crate) type StrategyOverrides = BTreeMap<String, (Option<StrategyConfig>, Option<StrategyConfig>)>;

/// Validate that every member of a group shards compatibly with the first.
///
/// `overrides` supplies not-yet-applied strategies and `extra_algorithms` the
/// registrations the same statement would add, so an ALTER can be validated
/// against its proposed state without touching the catalog.
pub(crate) fn check_group_compatibility(
    database: &str,
    config: &ShardingRuleConfig,
    group_name: &str,
    members: &[&str],
    overrides: &StrategyOverrides,
    extra_algorithms: &BTreeMap<String, AlgorithmConfig>,
) -> Result<()> {
    if members.len() < 2 {
        return Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: "sharding table reference".to_string(),
            database: database.to_string(),
            names: vec![group_name.to_string()],
            reason: "a table reference rule requires at least two tables".to_string(),
        });
    }
    let sample = member_fingerprints(config, members[0], overrides, extra_algorithms);
    let incompatible: Vec<String> = members[1..]
        .iter()
        .filter(|member| {
            member_fingerprints(config, member, overrides, extra_algorithms) != sample
        })
        .map(|member| (*member).to_string())
        .collect();
    if incompatible.is_empty() {
        Ok(())
    } else {
        Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: "sharding table reference".to_string(),
            database: database.to_string(),
            names: incompatible,
            reason: format!(
                "sharding strategies are not compatible with `{}` in reference rule `{}`",
                members[0], group_name
            ),
        })
    }
}

/// The (database, table) strategy fingerprints of one member, after falling
/// back to the catalog defaults. Auto tables expose their sharding strategy
/// at the table level.
fn member_fingerprints(
    config: &ShardingRuleConfig,
    member: &str,
    overrides: &StrategyOverrides,
    extra_algorithms: &BTreeMap<String, AlgorithmConfig>,
) -> (String, String) {
    let key = member.to_lowercase();
    let (database_strategy, table_strategy) = if let Some((database, table)) = overrides.get(&key) {
        (database.as_ref(), table.as_ref())
    } else if let Some(rule) = config.tables.get(&key) {
        (rule.database_strategy.as_ref(), rule.table_strategy.as_ref())
    } else if let Some(rule) = config.auto_tables.get(&key) {
        (None, Some(&rule.sharding_strategy))
    } else {
        (None, None)
    };
    let database_strategy = database_strategy.or(config.default_database_strategy.as_ref());
    let table_strategy = table_strategy.or(config.default_table_strategy.as_ref());
    (
        fingerprint(config, member, database_strategy, extra_algorithms),
        fingerprint(config, member, table_strategy, extra_algorithms),
    )
}

fn fingerprint(
    config: &ShardingRuleConfig,
    member: &str,
    strategy: Option<&StrategyConfig>,
    extra_algorithms: &BTreeMap<String, AlgorithmConfig>,
) -> String {
    let Some(strategy) = strategy else {
        return "none".to_string();
    };
    let Some(algorithm_name) = strategy.algorithm_name() else {
        return "none".to_string();
    };
    let algorithm = extra_algorithms
        .get(algorithm_name)
        .or_else(|| config.sharding_algorithms.get(algorithm_name));
    let mut result = format!("{:?}", strategy.kind());
    if let Some(algorithm) = algorithm {
        result.push('|');
        result.push_str(&algorithm.algorithm_type.to_uppercase());
        for (prop, value) in &algorithm.props {
            let mut value = name::replace_ignore_ascii_case(value, member, "{table}");
            for column in strategy.sharding_columns() {
                value = name::replace_ignore_ascii_case(&value, column, "{column}");
            }
            result.push('|');
            result.push_str(prop);
            result.push('=');
            result.push_str(&value);
        }
    }
    result
}
