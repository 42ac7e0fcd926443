//! The rule catalog data model.
//!
//! These types are the durable shape of a database's sharding metadata: the
//! persistence layer snapshots them as-is (hence the serde derives), and the
//! engine evolves them copy-on-write.

mod algorithm;
mod reference;
mod rule;
mod strategy;
mod table;

pub use algorithm::{AlgorithmCategory, AlgorithmConfig};
pub use reference::TableReferenceRuleConfig;
pub use rule::ShardingRuleConfig;
pub use strategy::{AuditStrategyConfig, KeyGenerateStrategyConfig, StrategyConfig, StrategyKind};
pub use table::{AutoTableRuleConfig, TableRuleConfig};
