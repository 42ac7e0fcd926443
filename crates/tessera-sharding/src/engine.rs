//! The public rule-engine pipeline: check, build, apply.
//!
//! [`execute`] dispatches a [`RuleStatement`] over a single `match`, runs the
//! matching checker against the current catalog, converts the statement into
//! a [`RuleDelta`], and applies it to a copy of the catalog. The catalog is
//! never touched before the checker succeeds, so a rejected statement leaves
//! it byte-for-byte unchanged; the caller swaps the returned catalog in
//! atomically.

use tracing::debug;

use tessera_distsql::statement::RuleStatement;

use crate::builder;
use crate::checker;
use crate::config::{AlgorithmCategory, ShardingRuleConfig};
use crate::delta::{DeltaMode, RuleDelta};
use crate::error::Result;
use crate::mutator;

/// The outcome of one successfully executed rule statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOutcome {
    /// The catalog after the statement, or `None` when it never existed
    /// (a guarded drop against an absent catalog).
    pub config: Option<ShardingRuleConfig>,
    /// Whether anything actually changed. `false` for guard no-ops.
    pub changed: bool,
    /// Whether the catalog is now structurally empty; the caller should then
    /// deregister the sharding rule type for the database.
    pub now_empty: bool,
    /// For DROP statements, exactly what was removed (current values),
    /// including registry entries pruned as orphans, so callers can release
    /// resources tied to those names.
    pub dropped: Option<RuleDelta>,
}

/// Execute one rule definition statement against the current catalog of
/// `database`. Returns the new catalog state or the checker's error; the
/// input catalog is never mutated.
pub fn execute(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    statement: &RuleStatement,
) -> Result<ExecuteOutcome> {
    debug!(database, statement = statement.kind(), "executing rule statement");
    match statement {
        RuleStatement::CreateShardingTableRule(stmt) => {
            checker::table::check_create(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::table::build_created(&base, stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::AlterShardingTableRule(stmt) => {
            checker::table::check_alter(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::table::build_altered(stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::DropShardingTableRule(stmt) => {
            checker::table::check_drop(database, current, stmt)?;
            let Some(config) = current else {
                return Ok(absent_noop());
            };
            let delta = builder::table::build_dropped(config, stmt);
            Ok(commit(config, delta))
        }
        RuleStatement::CreateShardingTableReferenceRule(stmt) => {
            checker::reference::check_create(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::reference::build_created(&base, stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::AlterShardingTableReferenceRule(stmt) => {
            checker::reference::check_alter(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::reference::build_altered(stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::DropShardingTableReferenceRule(stmt) => {
            checker::reference::check_drop(database, current, stmt)?;
            let Some(config) = current else {
                return Ok(absent_noop());
            };
            let delta = builder::reference::build_dropped(config, stmt);
            Ok(commit(config, delta))
        }
        RuleStatement::CreateDefaultShardingStrategy(stmt) => {
            checker::default_strategy::check_create(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::default_strategy::build_created(&base, stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::AlterDefaultShardingStrategy(stmt) => {
            checker::default_strategy::check_alter(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::default_strategy::build_altered(stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::DropDefaultShardingStrategy(stmt) => {
            checker::default_strategy::check_drop(database, current, stmt)?;
            let Some(config) = current else {
                return Ok(absent_noop());
            };
            let delta = builder::default_strategy::build_dropped(config, stmt);
            Ok(commit(config, delta))
        }
        RuleStatement::CreateShardingAlgorithm(stmt) => create_resource(
            database,
            current,
            AlgorithmCategory::Sharding,
            stmt.if_not_exists,
            &stmt.algorithms,
        ),
        RuleStatement::AlterShardingAlgorithm(stmt) => alter_resource(
            database,
            current,
            AlgorithmCategory::Sharding,
            &stmt.algorithms,
        ),
        RuleStatement::DropShardingAlgorithm(stmt) => drop_resource(
            database,
            current,
            AlgorithmCategory::Sharding,
            stmt.if_exists,
            &stmt.names,
        ),
        RuleStatement::CreateShardingKeyGenerator(stmt) => create_resource(
            database,
            current,
            AlgorithmCategory::KeyGenerator,
            stmt.if_not_exists,
            &stmt.key_generators,
        ),
        RuleStatement::AlterShardingKeyGenerator(stmt) => alter_resource(
            database,
            current,
            AlgorithmCategory::KeyGenerator,
            &stmt.key_generators,
        ),
        RuleStatement::DropShardingKeyGenerator(stmt) => drop_resource(
            database,
            current,
            AlgorithmCategory::KeyGenerator,
            stmt.if_exists,
            &stmt.names,
        ),
        RuleStatement::CreateShardingAuditor(stmt) => create_resource(
            database,
            current,
            AlgorithmCategory::Auditor,
            stmt.if_not_exists,
            &stmt.auditors,
        ),
        RuleStatement::AlterShardingAuditor(stmt) => alter_resource(
            database,
            current,
            AlgorithmCategory::Auditor,
            &stmt.auditors,
        ),
        RuleStatement::DropShardingAuditor(stmt) => drop_resource(
            database,
            current,
            AlgorithmCategory::Auditor,
            stmt.if_exists,
            &stmt.names,
        ),
        RuleStatement::CreateBroadcastTableRule(stmt) => {
            checker::broadcast::check_create(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::broadcast::build_created(&base, stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::AlterBroadcastTableRule(stmt) => {
            checker::broadcast::check_alter(database, current, stmt)?;
            let base = base_catalog(current);
            let delta = builder::broadcast::build_altered(stmt);
            Ok(commit(&base, delta))
        }
        RuleStatement::DropBroadcastTableRule(stmt) => {
            checker::broadcast::check_drop(database, current, stmt)?;
            let Some(config) = current else {
                return Ok(absent_noop());
            };
            let delta = builder::broadcast::build_dropped(config, stmt);
            Ok(commit(config, delta))
        }
    }
}

fn create_resource(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    category: AlgorithmCategory,
    if_not_exists: bool,
    algorithms: &[tessera_distsql::segment::NamedAlgorithmSegment],
) -> Result<ExecuteOutcome> {
    checker::algorithm::check_create(database, current, category, if_not_exists, algorithms)?;
    let base = base_catalog(current);
    let delta = builder::algorithm::build_created(&base, category, if_not_exists, algorithms);
    Ok(commit(&base, delta))
}

fn alter_resource(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    category: AlgorithmCategory,
    algorithms: &[tessera_distsql::segment::NamedAlgorithmSegment],
) -> Result<ExecuteOutcome> {
    checker::algorithm::check_alter(database, current, category, algorithms)?;
    let base = base_catalog(current);
    let delta = builder::algorithm::build_altered(category, algorithms);
    Ok(commit(&base, delta))
}

fn drop_resource(
    database: &str,
    current: Option<&ShardingRuleConfig>,
    category: AlgorithmCategory,
    if_exists: bool,
    names: &[String],
) -> Result<ExecuteOutcome> {
    checker::algorithm::check_drop(database, current, category, if_exists, names)?;
    let Some(config) = current else {
        return Ok(absent_noop());
    };
    let delta = builder::algorithm::build_dropped(config, category, names);
    Ok(commit(config, delta))
}

fn base_catalog(current: Option<&ShardingRuleConfig>) -> ShardingRuleConfig {
    current.cloned().unwrap_or_default()
}

/// Apply the delta and assemble the outcome. The apply itself never fails;
/// all rejection happened in the checker.
fn commit(config: &ShardingRuleConfig, delta: RuleDelta) -> ExecuteOutcome {
    let changed = !delta.is_noop();
    let (next, now_empty) = mutator::apply(config, &delta);
    let dropped = matches!(delta.mode, DeltaMode::Dropped).then_some(delta);
    ExecuteOutcome {
        config: Some(next),
        changed,
        now_empty,
        dropped,
    }
}

/// Outcome for a guarded drop against a catalog that never existed.
fn absent_noop() -> ExecuteOutcome {
    ExecuteOutcome {
        config: None,
        changed: false,
        now_empty: false,
        dropped: None,
    }
}
