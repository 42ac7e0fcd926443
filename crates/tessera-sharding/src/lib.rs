//! Sharding rule catalog engine for the Tessera proxy.
//!
//! Accepts parsed rule definition statements (`tessera-distsql`) and evolves
//! a per-database sharding catalog through a strict pipeline: a statement
//! checker validates against the current catalog, a delta builder converts
//! the statement into a catalog fragment, and the mutator applies the
//! fragment to a copy of the catalog in one step, folding in garbage
//! collection of orphaned algorithms, key generators, and auditors.
//!
//! # Example
//!
//! ```
//! use tessera_distsql::segment::{AlgorithmSegment, AutoTableRuleSegment, TableRuleDefinition};
//! use tessera_distsql::statement::{CreateShardingTableRule, RuleStatement};
//! use tessera_sharding::engine;
//!
//! let statement = RuleStatement::CreateShardingTableRule(CreateShardingTableRule {
//!     if_not_exists: false,
//!     rules: vec![TableRuleDefinition::Auto(
//!         AutoTableRuleSegment::new("t_order", vec!["ds_0".into(), "ds_1".into()])
//!             .with_sharding_column("order_id")
//!             .with_algorithm(AlgorithmSegment::new("HASH_MOD").with_prop("sharding-count", "4")),
//!     )],
//! });
//! let outcome = engine::execute("sharding_db", None, &statement).unwrap();
//! assert!(outcome.changed);
//! let catalog = outcome.config.unwrap();
//! assert!(catalog.auto_tables.contains_key("t_order"));
//! ```

pub mod builder;
pub mod checker;
pub mod config;
pub mod delta;
pub mod engine;
pub mod error;
pub mod mutator;
pub mod name;
pub mod plugin;
pub mod query;
pub mod scanner;

pub use config::ShardingRuleConfig;
pub use delta::{DeltaMode, RuleDelta};
pub use engine::{execute, ExecuteOutcome};
pub use error::{Result, ShardingRuleError};
