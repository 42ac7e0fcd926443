//! Shared strategy-clause validation.

use tessera_distsql::segment::{AuditStrategySegment, KeyGenerateSegment, StrategySegment};

use crate::builder::convert;
use crate::config::{AlgorithmCategory, ShardingRuleConfig, StrategyKind};
use crate::error::{Result, ShardingRuleError};
use crate::plugin;

/// Validate one strategy clause: recognized type, column arity, and exactly
/// one algorithm source (registered name or inline definition) for non-NONE
/// types. `owner` names the table or default the clause belongs to, for
/// error messages.
pub(crate) fn check_strategy_segment(
    database: &str,
    config: &ShardingRuleConfig,
    segment: &StrategySegment,
    owner: &str,
) -> Result<()> {
    let Some(kind) = StrategyKind::parse(&segment.strategy_type) else {
        return Err(ShardingRuleError::InvalidAlgorithmConfiguration {
            rule_kind: "sharding".to_string(),
            database: database.to_string(),
            names: vec![owner.to_string()],
            reason: format!("unrecognized strategy type `{}`", segment.strategy_type),
        });
    };
    let columns = convert::strategy_columns(segment);
    if !kind.accepts_columns(columns.len()) {
        return Err(ShardingRuleError::InvalidRuleConfiguration {
            rule_kind: "sharding".to_string(),
            database: database.to_string(),
            names: vec![owner.to_string()],
            reason: format!(
                "strategy type `{}` does not accept {} sharding column(s)",
                segment.strategy_type,
                columns.len()
            ),
        });
    }
    match kind {
        StrategyKind::None => {
            if segment.algorithm_name.is_some() || segment.algorithm.is_some() {
                return Err(ShardingRuleError::InvalidRuleConfiguration {
                    rule_kind: "sharding".to_string(),
                    database: database.to_string(),
                    names: vec![owner.to_string()],
                    reason: "a NONE strategy must not name a sharding algorithm".to_string(),
                });
            }
        }
        _ => match (&segment.algorithm_name, &segment.algorithm) {
            (Some(name), None) => {
                if !config.sharding_algorithms.contains_key(name) {
                    return Err(ShardingRuleError::MissingRequiredAlgorithm {
                        rule_kind: AlgorithmCategory::Sharding.to_string(),
                        database: database.to_string(),
                        names: vec![name.clone()],
                    });
                }
            }
            (None, Some(algorithm)) => {
                plugin::check(
                    database,
                    AlgorithmCategory::Sharding,
                    &algorithm.type_name,
                    &algorithm.props,
                )?;
            }
            _ => {
                return Err(ShardingRuleError::InvalidAlgorithmConfiguration {
                    rule_kind: "sharding".to_string(),
                    database: database.to_string(),
                    names: vec![owner.to_string()],
                    reason: format!(
                        "strategy type `{}` requires exactly one sharding algorithm",
                        segment.strategy_type
                    ),
                });
            }
        },
    }
    Ok(())
}

/// Validate a key-generate clause: a registered generator name or a
/// recognized inline definition.
pub(crate) fn check_key_generate_segment(
    database: &str,
    config: &ShardingRuleConfig,
    segment: &KeyGenerateSegment,
    owner: &str,
) -> Result<()> {
    match (&segment.key_generator_name, &segment.algorithm) {
        (Some(name), None) => {
            if !config.key_generators.contains_key(name) {
                return Err(ShardingRuleError::MissingRequiredAlgorithm {
                    rule_kind: AlgorithmCategory::KeyGenerator.to_string(),
                    database: database.to_string(),
                    names: vec![name.clone()],
                });
            }
        }
        (None, Some(algorithm)) => {
            plugin::check(
                database,
                AlgorithmCategory::KeyGenerator,
                &algorithm.type_name,
                &algorithm.props,
            )?;
        }
        _ => {
            return Err(ShardingRuleError::InvalidAlgorithmConfiguration {
                rule_kind: AlgorithmCategory::KeyGenerator.to_string(),
                database: database.to_string(),
                names: vec![owner.to_string()],
                reason: "a key-generate strategy requires exactly one key generator".to_string(),
            });
        }
    }
    Ok(())
}

/// Validate an audit clause: every declared auditor type must be recognized.
pub(crate) fn check_audit_segment(
    database: &str,
    segment: &AuditStrategySegment,
) -> Result<()> {
    for auditor in &segment.auditors {
        plugin::check(
            database,
            AlgorithmCategory::Auditor,
            &auditor.algorithm.type_name,
            &auditor.algorithm.props,
        )?;
    }
    Ok(())
}
