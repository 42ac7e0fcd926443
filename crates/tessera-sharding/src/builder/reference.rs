//! Delta builders for sharding table reference rule statements.

use tessera_distsql::statement::{
    AlterShardingTableReferenceRule, CreateShardingTableReferenceRule,
    DropShardingTableReferenceRule,
};

use crate::config::{ShardingRuleConfig, TableReferenceRuleConfig};
use crate::delta::{DeltaMode, RuleDelta};

/// Build the fragment a `CREATE SHARDING TABLE REFERENCE RULE` adds.
pub fn build_created(
    config: &ShardingRuleConfig,
    statement: &CreateShardingTableReferenceRule,
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Created);
    for rule in &statement.rules {
        if statement.if_not_exists && config.binding_group(&rule.name).is_some() {
            continue;
        }
        delta
            .binding_table_groups
            .push(TableReferenceRuleConfig::new(&rule.name, &rule.reference));
    }
    delta
}

/// Build the fragment an `ALTER SHARDING TABLE REFERENCE RULE` replaces.
pub fn build_altered(statement: &AlterShardingTableReferenceRule) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Altered);
    for rule in &statement.rules {
        delta
            .binding_table_groups
            .push(TableReferenceRuleConfig::new(&rule.name, &rule.reference));
    }
    delta
}

/// Build the fragment a `DROP SHARDING TABLE REFERENCE RULE` removes,
/// capturing the current member lists of the dropped groups.
pub fn build_dropped(
    config: &ShardingRuleConfig,
    statement: &DropShardingTableReferenceRule,
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Dropped);
    for name in &statement.names {
        if let Some(group) = config.binding_group(name) {
            delta.binding_table_groups.push(group.clone());
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_distsql::segment::TableReferenceRuleSegment;

    #[test]
    fn test_build_created_filters_existing_groups_under_guard() {
        let mut config = ShardingRuleConfig::new();
        config
            .binding_table_groups
            .push(TableReferenceRuleConfig::new("ref_0", "t_order,t_order_item"));
        let delta = build_created(
            &config,
            &CreateShardingTableReferenceRule {
                if_not_exists: true,
                rules: vec![
                    TableReferenceRuleSegment::new("REF_0", "t_order,t_order_item"),
                    TableReferenceRuleSegment::new("ref_1", "t_a,t_b"),
                ],
            },
        );
        assert_eq!(delta.binding_table_groups.len(), 1);
        assert_eq!(delta.binding_table_groups[0].name, "ref_1");
    }

    #[test]
    fn test_build_dropped_captures_current_groups() {
        let mut config = ShardingRuleConfig::new();
        config
            .binding_table_groups
            .push(TableReferenceRuleConfig::new("ref_0", "t_order,t_order_item"));
        let delta = build_dropped(
            &config,
            &DropShardingTableReferenceRule {
                if_exists: true,
                names: vec!["REF_0".into(), "ref_missing".into()],
            },
        );
        assert_eq!(delta.binding_table_groups.len(), 1);
        assert_eq!(delta.binding_table_groups[0].reference, "t_order,t_order_item");
    }
}
