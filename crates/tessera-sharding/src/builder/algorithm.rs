//! Delta builders for named registry resources (sharding algorithms, key
//! generators, auditors), parameterized by [`AlgorithmCategory`].

use tessera_distsql::segment::NamedAlgorithmSegment;

use crate::config::{AlgorithmCategory, AlgorithmConfig, ShardingRuleConfig};
use crate::delta::{DeltaMode, RuleDelta};

/// Build the fragment a CREATE of named resources adds. Under
/// `IF NOT EXISTS`, names already registered are filtered out.
pub fn build_created(
    config: &ShardingRuleConfig,
    category: AlgorithmCategory,
    if_not_exists: bool,
    algorithms: &[NamedAlgorithmSegment],
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Created);
    for algorithm in algorithms {
        if if_not_exists && config.registry(category).contains_key(&algorithm.name) {
            continue;
        }
        register(&mut delta, category, algorithm);
    }
    delta
}

/// Build the fragment an ALTER of named resources replaces.
pub fn build_altered(
    category: AlgorithmCategory,
    algorithms: &[NamedAlgorithmSegment],
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Altered);
    for algorithm in algorithms {
        register(&mut delta, category, algorithm);
    }
    delta
}

/// Build the fragment a DROP of named resources removes, capturing the
/// current definitions. The checker already rejected in-use names, so no
/// cascading GC is needed.
pub fn build_dropped(
    config: &ShardingRuleConfig,
    category: AlgorithmCategory,
    names: &[String],
) -> RuleDelta {
    let mut delta = RuleDelta::new(DeltaMode::Dropped);
    for name in names {
        if let Some(algorithm) = config.registry(category).get(name) {
            delta
                .registry_mut(category)
                .insert(name.clone(), algorithm.clone());
        }
    }
    delta
}

fn register(delta: &mut RuleDelta, category: AlgorithmCategory, algorithm: &NamedAlgorithmSegment) {
    delta.registry_mut(category).insert(
        algorithm.name.clone(),
        AlgorithmConfig {
            algorithm_type: algorithm.algorithm.type_name.clone(),
            props: algorithm.algorithm.props.clone(),
        },
    );
}
