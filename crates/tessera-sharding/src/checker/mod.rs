//! Statement checkers.
//!
//! One checker per operation kind. A checker reads the current catalog and
//! the statement, and either returns `Ok(())` or a typed error naming every
//! offending entity. Checkers never mutate anything; a statement that passes
//! its checker is guaranteed to convert and apply cleanly.

pub mod algorithm;
mod binding;
pub mod broadcast;
pub mod default_strategy;
pub mod reference;
mod strategy;
pub mod table;

use std::collections::BTreeSet;

use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::error::{Result, ShardingRuleError};
use crate::name;
use crate::scanner;

pub(crate) use binding::{check_group_compatibility, StrategyOverrides};
pub(crate) use strategy::{check_audit_segment, check_key_generate_segment, check_strategy_segment};

/// The catalog must exist for ALTER and DROP operations.
fn require_catalog<'a>(
    database: &str,
    current: Option<&'a ShardingRuleConfig>,
    rule_kind: &str,
) -> Result<&'a ShardingRuleConfig> {
    current.ok_or_else(|| ShardingRuleError::MissingRequiredRule {
        rule_kind: rule_kind.to_string(),
        database: database.to_string(),
        names: Vec::new(),
    })
}

/// Reject case-insensitive duplicates within one statement, naming them all.
fn check_no_duplicates<'a>(
    database: &str,
    rule_kind: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let duplicated = name::duplicated(names);
    if duplicated.is_empty() {
        Ok(())
    } else {
        Err(ShardingRuleError::DuplicateRule {
            rule_kind: rule_kind.to_string(),
            database: database.to_string(),
            names: duplicated,
        })
    }
}

/// Reject registry names a statement would newly declare (synthesized or
/// explicit) that collide, ignoring case, with each other or with existing
/// entries the statement does not replace.
///
/// An existing entry counts as replaced when every one of its referrers is in
/// `replaced_referrers` (lowercase table keys or default-strategy pseudo
/// labels); such a collision is an overwrite of the statement's own previous
/// registration, not a conflict.
fn check_declared_name_collisions(
    database: &str,
    config: &ShardingRuleConfig,
    rule_kind: &str,
    declared: &[(AlgorithmCategory, String)],
    replaced_referrers: &BTreeSet<String>,
) -> Result<()> {
    let mut offending = Vec::new();
    let mut seen = name::CaseInsensitiveSet::new();
    for (category, declared_name) in declared {
        if !seen.insert(declared_name) {
            offending.push(declared_name.clone());
            continue;
        }
        let collided = config
            .registry(*category)
            .keys()
            .find(|existing| existing.eq_ignore_ascii_case(declared_name));
        if let Some(existing) = collided {
            let referrers = scanner::referrers(config, *category, existing);
            let replaced = !referrers.is_empty()
                && referrers
                    .iter()
                    .all(|referrer| replaced_referrers.contains(referrer));
            if !replaced {
                offending.push(declared_name.clone());
            }
        }
    }
    if offending.is_empty() {
        Ok(())
    } else {
        Err(ShardingRuleError::DuplicateRule {
            rule_kind: rule_kind.to_string(),
            database: database.to_string(),
            names: offending,
        })
    }
}
