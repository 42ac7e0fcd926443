//! Segment-to-config conversion and synthesized algorithm names.
//!
//! Converting a validated segment is infallible: the checker has already
//! rejected unrecognized strategy types, missing algorithms, and bad column
//! arity. Inline algorithm definitions are registered into the delta under a
//! deterministic lowercase name so that re-running the same statement always
//! produces the same registry keys.

use tessera_distsql::segment::{
    AuditStrategySegment, AutoTableRuleSegment, KeyGenerateSegment, StrategySegment,
    TableRuleDefinition, TableRuleSegment,
};
use tessera_distsql::statement::StrategyScope;

use crate::config::{
    AlgorithmCategory, AlgorithmConfig, AuditStrategyConfig, AutoTableRuleConfig,
    KeyGenerateStrategyConfig, StrategyConfig, StrategyKind, TableRuleConfig,
};
use crate::delta::RuleDelta;

/// Sharding columns of a strategy segment. COMPLEX strategies carry a
/// comma-joined column list in a single field.
pub(crate) fn strategy_columns(segment: &StrategySegment) -> Vec<&str> {
    segment
        .sharding_column
        .as_deref()
        .map(|columns| {
            columns
                .split(',')
                .map(str::trim)
                .filter(|column| !column.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Registry name synthesized for an inline strategy algorithm:
/// `default_<scope>_<type>` for catalog defaults, `<table>_<scope>_<type>`
/// for per-table strategies.
pub(crate) fn strategy_algorithm_name(
    owner: Option<&str>,
    scope: StrategyScope,
    type_name: &str,
) -> String {
    match owner {
        None => format!("default_{}_{}", scope.label(), type_name).to_lowercase(),
        Some(table) => format!("{}_{}_{}", table, scope.label(), type_name).to_lowercase(),
    }
}

/// Registry name synthesized for an auto table's inline sharding algorithm.
pub(crate) fn auto_table_algorithm_name(table: &str, column: &str, type_name: &str) -> String {
    format!("{table}_{column}_{type_name}").to_lowercase()
}

/// Registry name synthesized for an inline key generator.
pub(crate) fn key_generator_name(table: &str, column: &str) -> String {
    format!("{table}_{column}").to_lowercase()
}

/// Convert a strategy segment, registering an inline algorithm into `delta`.
pub(crate) fn convert_strategy(
    owner: Option<&str>,
    scope: StrategyScope,
    segment: &StrategySegment,
    delta: &mut RuleDelta,
) -> StrategyConfig {
    // The checker guarantees the type parses; NONE doubles as the fallback.
    let kind = StrategyKind::parse(&segment.strategy_type).unwrap_or(StrategyKind::None);
    if kind == StrategyKind::None {
        return StrategyConfig::None;
    }
    let algorithm_name = match (&segment.algorithm_name, &segment.algorithm) {
        (Some(name), _) => name.clone(),
        (None, Some(algorithm)) => {
            let name = strategy_algorithm_name(owner, scope, &algorithm.type_name);
            delta.sharding_algorithms.insert(
                name.clone(),
                AlgorithmConfig {
                    algorithm_type: algorithm.type_name.clone(),
                    props: algorithm.props.clone(),
                },
            );
            name
        }
        (None, None) => String::new(),
    };
    let columns = strategy_columns(segment);
    match kind {
        StrategyKind::None => StrategyConfig::None,
        StrategyKind::Standard => StrategyConfig::Standard {
            sharding_column: columns.first().map(|c| (*c).to_string()).unwrap_or_default(),
            algorithm_name,
        },
        StrategyKind::Complex => StrategyConfig::Complex {
            sharding_columns: columns.iter().map(|c| (*c).to_string()).collect(),
            algorithm_name,
        },
        StrategyKind::Hint => StrategyConfig::Hint { algorithm_name },
    }
}

/// Convert an auto table's sharding clause into its (always Standard) strategy.
pub(crate) fn convert_auto_table_strategy(
    segment: &AutoTableRuleSegment,
    delta: &mut RuleDelta,
) -> StrategyConfig {
    let column = segment.sharding_column.clone().unwrap_or_default();
    let algorithm_name = match (&segment.algorithm_name, &segment.algorithm) {
        (Some(name), _) => name.clone(),
        (None, Some(algorithm)) => {
            let name = auto_table_algorithm_name(&segment.table, &column, &algorithm.type_name);
            delta.sharding_algorithms.insert(
                name.clone(),
                AlgorithmConfig {
                    algorithm_type: algorithm.type_name.clone(),
                    props: algorithm.props.clone(),
                },
            );
            name
        }
        (None, None) => String::new(),
    };
    StrategyConfig::Standard {
        sharding_column: column,
        algorithm_name,
    }
}

/// Convert a key-generate clause, registering an inline generator into `delta`.
pub(crate) fn convert_key_generate(
    table: &str,
    segment: &KeyGenerateSegment,
    delta: &mut RuleDelta,
) -> KeyGenerateStrategyConfig {
    let key_generator_name = match (&segment.key_generator_name, &segment.algorithm) {
        (Some(name), _) => name.clone(),
        (None, Some(algorithm)) => {
            let name = key_generator_name(table, &segment.column);
            delta.key_generators.insert(
                name.clone(),
                AlgorithmConfig {
                    algorithm_type: algorithm.type_name.clone(),
                    props: algorithm.props.clone(),
                },
            );
            name
        }
        (None, None) => String::new(),
    };
    KeyGenerateStrategyConfig {
        column: segment.column.clone(),
        key_generator_name,
    }
}

/// Convert an audit clause, registering each declared auditor into `delta`.
pub(crate) fn convert_audit(
    segment: &AuditStrategySegment,
    delta: &mut RuleDelta,
) -> AuditStrategyConfig {
    let mut auditor_names = Vec::with_capacity(segment.auditors.len());
    for auditor in &segment.auditors {
        delta.auditors.insert(
            auditor.name.clone(),
            AlgorithmConfig {
                algorithm_type: auditor.algorithm.type_name.clone(),
                props: auditor.algorithm.props.clone(),
            },
        );
        auditor_names.push(auditor.name.clone());
    }
    AuditStrategyConfig {
        auditor_names,
        allow_hint_disable: segment.allow_hint_disable,
    }
}

/// Convert a full table rule segment into its config, registering every
/// inline algorithm, key generator, and auditor into `delta`.
pub(crate) fn convert_table_rule(segment: &TableRuleSegment, delta: &mut RuleDelta) -> TableRuleConfig {
    TableRuleConfig {
        logic_table: segment.table.clone(),
        actual_data_nodes: segment.data_nodes.clone(),
        database_strategy: segment
            .database_strategy
            .as_ref()
            .map(|strategy| {
                convert_strategy(Some(&segment.table), StrategyScope::Database, strategy, delta)
            }),
        table_strategy: segment
            .table_strategy
            .as_ref()
            .map(|strategy| {
                convert_strategy(Some(&segment.table), StrategyScope::Table, strategy, delta)
            }),
        key_generate_strategy: segment
            .key_generate
            .as_ref()
            .map(|key_generate| convert_key_generate(&segment.table, key_generate, delta)),
        audit_strategy: segment.audit.as_ref().map(|audit| convert_audit(audit, delta)),
    }
}

/// Convert an auto table rule segment into its config.
pub(crate) fn convert_auto_table_rule(
    segment: &AutoTableRuleSegment,
    delta: &mut RuleDelta,
) -> AutoTableRuleConfig {
    AutoTableRuleConfig {
        logic_table: segment.table.clone(),
        actual_data_sources: segment.storage_units.clone(),
        sharding_strategy: convert_auto_table_strategy(segment, delta),
        key_generate_strategy: segment
            .key_generate
            .as_ref()
            .map(|key_generate| convert_key_generate(&segment.table, key_generate, delta)),
        audit_strategy: segment.audit.as_ref().map(|audit| convert_audit(audit, delta)),
    }
}

/// Every registry name a table rule definition would newly declare: synthesized
/// names for inline strategies/key generators plus declared auditor names.
/// The checker uses this list for collision detection before any conversion.
pub(crate) fn declared_names(definition: &TableRuleDefinition) -> Vec<(AlgorithmCategory, String)> {
    let mut names = Vec::new();
    match definition {
        TableRuleDefinition::Table(segment) => {
            for (scope, strategy) in [
                (StrategyScope::Database, &segment.database_strategy),
                (StrategyScope::Table, &segment.table_strategy),
            ] {
                if let Some(strategy) = strategy {
                    if let Some(algorithm) = &strategy.algorithm {
                        names.push((
                            AlgorithmCategory::Sharding,
                            strategy_algorithm_name(
                                Some(&segment.table),
                                scope,
                                &algorithm.type_name,
                            ),
                        ));
                    }
                }
            }
            if let Some(key_generate) = &segment.key_generate {
                if key_generate.algorithm.is_some() {
                    names.push((
                        AlgorithmCategory::KeyGenerator,
                        key_generator_name(&segment.table, &key_generate.column),
                    ));
                }
            }
            if let Some(audit) = &segment.audit {
                for auditor in &audit.auditors {
                    names.push((AlgorithmCategory::Auditor, auditor.name.clone()));
                }
            }
        }
        TableRuleDefinition::Auto(segment) => {
            if let Some(algorithm) = &segment.algorithm {
                names.push((
                    AlgorithmCategory::Sharding,
                    auto_table_algorithm_name(
                        &segment.table,
                        segment.sharding_column.as_deref().unwrap_or_default(),
                        &algorithm.type_name,
                    ),
                ));
            }
            if let Some(key_generate) = &segment.key_generate {
                if key_generate.algorithm.is_some() {
                    names.push((
                        AlgorithmCategory::KeyGenerator,
                        key_generator_name(&segment.table, &key_generate.column),
                    ));
                }
            }
            if let Some(audit) = &segment.audit {
                for auditor in &audit.auditors {
                    names.push((AlgorithmCategory::Auditor, auditor.name.clone()));
                }
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::DeltaMode;
    use tessera_distsql::segment::AlgorithmSegment;

    #[test]
    fn test_synthesized_names_are_lowercase() {
        assert_eq!(
            strategy_algorithm_name(None, StrategyScope::Table, "HASH_MOD"),
            "default_table_hash_mod"
        );
        assert_eq!(
            strategy_algorithm_name(Some("T_Order"), StrategyScope::Database, "INLINE"),
            "t_order_database_inline"
        );
        assert_eq!(
            auto_table_algorithm_name("t_order", "order_id", "HASH_MOD"),
            "t_order_order_id_hash_mod"
        );
        assert_eq!(key_generator_name("T_ORDER", "Order_ID"), "t_order_order_id");
    }

    #[test]
    fn test_convert_strategy_registers_inline_algorithm() {
        let mut delta = RuleDelta::new(DeltaMode::Created);
        let segment = StrategySegment::inline(
            "STANDARD",
            Some("order_id"),
            AlgorithmSegment::new("MOD").with_prop("sharding-count", "4"),
        );
        let strategy =
            convert_strategy(Some("t_order"), StrategyScope::Table, &segment, &mut delta);
        assert_eq!(
            strategy,
            StrategyConfig::Standard {
                sharding_column: "order_id".into(),
                algorithm_name: "t_order_table_mod".into(),
            }
        );
        assert!(delta.sharding_algorithms.contains_key("t_order_table_mod"));
    }

    #[test]
    fn test_convert_strategy_keeps_named_reference() {
        let mut delta = RuleDelta::new(DeltaMode::Created);
        let segment = StrategySegment::named("HINT", None, "hint_algo");
        let strategy = convert_strategy(None, StrategyScope::Database, &segment, &mut delta);
        assert_eq!(
            strategy,
            StrategyConfig::Hint {
                algorithm_name: "hint_algo".into()
            }
        );
        assert!(delta.sharding_algorithms.is_empty());
    }

    #[test]
    fn test_convert_complex_splits_columns() {
        let mut delta = RuleDelta::new(DeltaMode::Created);
        let segment = StrategySegment::named("COMPLEX", Some("user_id, order_id"), "algo");
        let strategy = convert_strategy(Some("t_order"), StrategyScope::Table, &segment, &mut delta);
        assert_eq!(
            strategy,
            StrategyConfig::Complex {
                sharding_columns: vec!["user_id".into(), "order_id".into()],
                algorithm_name: "algo".into(),
            }
        );
    }

    #[test]
    fn test_declared_names_for_auto_table() {
        let segment = AutoTableRuleSegment::new("t_order", vec!["ds_0".into()])
            .with_sharding_column("order_id")
            .with_algorithm(AlgorithmSegment::new("HASH_MOD").with_prop("sharding-count", "4"));
        let names = declared_names(&TableRuleDefinition::Auto(segment));
        assert_eq!(
            names,
            vec![(
                AlgorithmCategory::Sharding,
                "t_order_order_id_hash_mod".to_string()
            )]
        );
    }
}
