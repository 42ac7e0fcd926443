//! Delta builders for default sharding strategy statements.

use tessera_distsql::statement::{
    AlterDefaultShardingStrategy, CreateDefaultShardingStrategy, DropDefaultShardingStrategy,
    StrategyScope,
};

use crate::config::ShardingRuleConfig;
use crate::delta::{DeltaMode, RuleDelta};

use super::convert;
use super::table::capture_orphans;

/// Build the fragment a `CREATE DEFAULT SHARDING STRATEGY` adds. Returns an
/// empty delta when the guard made the statement a no-op.
pub fn build_created(
    config: &ShardingRuleConfig,
    statement: &CreateDefaultShardingStrategy,
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Created);
    let exists = match statement.scope {
        StrategyScope::Database => config.default_database_strategy.is_some(),
        StrategyScope::Table => config.default_table_strategy.is_some(),
    };
    if statement.if_not_exists && exists {
        return delta;
    }
    set_default(&mut delta, statement.scope, &statement.strategy);
    delta
}

/// Build the fragment an `ALTER DEFAULT SHARDING STRATEGY` replaces. The
/// default is wholesale-replaced, so the previous strategy's algorithm may
/// become orphaned; the mutator prunes it.
pub fn build_altered(statement: &AlterDefaultShardingStrategy) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Altered);
    delta.prune_unused = true;
    set_default(&mut delta, statement.scope, &statement.strategy);
    delta
}

/// Build the fragment a `DROP DEFAULT SHARDING STRATEGY` removes, capturing
/// the current strategy and whatever its removal orphans.
pub fn build_dropped(
    config: &ShardingRuleConfig,
    statement: &DropDefaultShardingStrategy,
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Dropped);
    delta.prune_unused = true;
    let mut stripped = config.clone();
    match statement.scope {
        StrategyScope::Database => {
            delta.default_database_strategy = stripped.default_database_strategy.take();
        }
        StrategyScope::Table => {
            delta.default_table_strategy = stripped.default_table_strategy.take();
        }
    }
    capture_orphans(config, &stripped, &mut delta);
    delta
}

fn set_default(
    delta: &mut RuleDelta,
    scope: StrategyScope,
    strategy: &tessera_distsql::segment::StrategySegment,
) {
    let converted = convert::convert_strategy(None, scope, strategy, delta);
    match scope {
        StrategyScope::Database => delta.default_database_strategy = Some(converted),
        StrategyScope::Table => delta.default_table_strategy = Some(converted),
    }
}
