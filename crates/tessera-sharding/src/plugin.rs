//! The closed registry of recognized algorithm implementations.
//!
//! The engine never runs an algorithm; it only needs to know which type
//! identifiers exist, which properties they require, and which sharding
//! algorithms can derive an auto table's shard count. Keeping this a static
//! table (rather than runtime plugin loading) keeps validation deterministic.

use std::collections::BTreeMap;

use crate::config::AlgorithmCategory;
use crate::error::{Result, ShardingRuleError};

/// Static description of one recognized algorithm type.
#[derive(Debug, Clone, Copy)]
pub struct AlgorithmSpec {
    /// Canonical type identifier; statements match it case-insensitively.
    pub type_name: &'static str,
    /// Properties that must be present in the definition.
    pub required_props: &'static [&'static str],
    /// Whether the algorithm can derive an auto table's shard count.
    pub auto_table: bool,
}

const SHARDING_ALGORITHMS: &[AlgorithmSpec] = &[
    AlgorithmSpec {
        type_name: "MOD",
        required_props: &["sharding-count"],
        auto_table: true,
    },
    AlgorithmSpec {
        type_name: "HASH_MOD",
        required_props: &["sharding-count"],
        auto_table: true,
    },
    AlgorithmSpec {
        type_name: "VOLUME_RANGE",
        required_props: &["range-lower", "range-upper", "sharding-volume"],
        auto_table: true,
    },
    AlgorithmSpec {
        type_name: "BOUNDARY_RANGE",
        required_props: &["sharding-ranges"],
        auto_table: true,
    },
    AlgorithmSpec {
        type_name: "AUTO_INTERVAL",
        required_props: &["datetime-lower", "datetime-upper", "sharding-seconds"],
        auto_table: true,
    },
    AlgorithmSpec {
        type_name: "INLINE",
        required_props: &["algorithm-expression"],
        auto_table: false,
    },
    AlgorithmSpec {
        type_name: "INTERVAL",
        required_props: &["datetime-pattern", "datetime-lower", "sharding-suffix-pattern"],
        auto_table: false,
    },
    AlgorithmSpec {
        type_name: "COMPLEX_INLINE",
        required_props: &["algorithm-expression"],
        auto_table: false,
    },
    AlgorithmSpec {
        type_name: "HINT_INLINE",
        required_props: &[],
        auto_table: false,
    },
];

const KEY_GENERATORS: &[AlgorithmSpec] = &[
    AlgorithmSpec {
        type_name: "SNOWFLAKE",
        required_props: &[],
        auto_table: false,
    },
    AlgorithmSpec {
        type_name: "UUID",
        required_props: &[],
        auto_table: false,
    },
];

const AUDITORS: &[AlgorithmSpec] = &[AlgorithmSpec {
    type_name: "DML_SHARDING_CONDITIONS",
    required_props: &[],
    auto_table: false,
}];

/// Look up a recognized algorithm type, ignoring case.
pub fn find(category: AlgorithmCategory, type_name: &str) -> Option<&'static AlgorithmSpec> {
    let specs = match category {
        AlgorithmCategory::Sharding => SHARDING_ALGORITHMS,
        AlgorithmCategory::KeyGenerator => KEY_GENERATORS,
        AlgorithmCategory::Auditor => AUDITORS,
    };
    specs
        .iter()
        .find(|spec| spec.type_name.eq_ignore_ascii_case(type_name))
}

/// Validate that `type_name` is a recognized implementation for `category`
/// and that all of its required properties are present.
pub fn check(
    database: &str,
    category: AlgorithmCategory,
    type_name: &str,
    props: &BTreeMap<String, String>,
) -> Result<&'static AlgorithmSpec> {
    let spec = find(category, type_name).ok_or_else(|| ShardingRuleError::UnregisteredAlgorithm {
        rule_kind: category.to_string(),
        database: database.into(),
        names: vec![type_name.into()],
    })?;
    let missing: Vec<String> = spec
        .required_props
        .iter()
        .filter(|prop| !props.contains_key(**prop))
        .map(|prop| (*prop).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ShardingRuleError::InvalidAlgorithmConfiguration {
            rule_kind: category.to_string(),
            database: database.into(),
            names: vec![type_name.into()],
            reason: format!("missing required properties: {}", missing.join(", ")),
        });
    }
    Ok(spec)
}
