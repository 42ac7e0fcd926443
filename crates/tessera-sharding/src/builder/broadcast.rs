//! Delta builders for broadcast table rule statements.

use tessera_distsql::statement::{
    AlterBroadcastTableRule, CreateBroadcastTableRule, DropBroadcastTableRule,
};

use crate::config::ShardingRuleConfig;
use crate::delta::{DeltaMode, RuleDelta};

/// Build the fragment a `CREATE BROADCAST TABLE RULE` adds. Broadcast names
/// are stored lowercase, matching the catalog's case-insensitive identity.
pub fn build_created(
    config: &ShardingRuleConfig,
    statement: &CreateBroadcastTableRule,
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Created);
    for table in &statement.tables {
        let key = table.to_lowercase();
        if statement.if_not_exists && config.broadcast_tables.contains(&key) {
            continue;
        }
        delta.broadcast_tables.push(key);
    }
    delta
}

/// Build the fragment an `ALTER BROADCAST TABLE RULE` replaces: the full new
/// broadcast set.
pub fn build_altered(statement: &AlterBroadcastTableRule) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Altered);
    delta.broadcast_tables = statement
        .tables
        .iter()
        .map(|table| table.to_lowercase())
        .collect();
    delta
}

/// Build the fragment a `DROP BROADCAST TABLE RULE` removes.
pub fn build_dropped(
    config: &ShardingRuleConfig,
    statement: &DropBroadcastTableRule,
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Dropped);
    for table in &statement.tables {
        let key = table.to_lowercase();
        if config.broadcast_tables.contains(&key) {
            delta.broadcast_tables.push(key);
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_created_lowercases_and_filters() {
        let mut config = ShardingRuleConfig::new();
        config.broadcast_tables.insert("t_dict".into());
        let delta = build_created(
            &config,
            &CreateBroadcastTableRule {
                if_not_exists: true,
                tables: vec!["T_DICT".into(), "T_Country".into()],
            },
        );
        assert_eq!(delta.broadcast_tables, vec!["t_country".to_string()]);
    }

    #[test]
    fn test_build_dropped_only_names_present_tables() {
        let mut config = ShardingRuleConfig::new();
        config.broadcast_tables.insert("t_dict".into());
        let delta = build_dropped(
            &config,
            &DropBroadcastTableRule {
                if_exists: true,
                tables: vec!["T_DICT".into(), "t_missing".into()],
            },
        );
        assert_eq!(delta.broadcast_tables, vec!["t_dict".to_string()]);
    }
}
