//! Parsed DistSQL statement value objects for the Tessera proxy.
//!
//! The DistSQL grammar and visitor live in a separate parsing subsystem; this
//! crate only defines the typed values that subsystem produces. The sharding
//! rule engine (`tessera-sharding`) consumes these values and never sees SQL
//! text.

pub mod segment;
pub mod statement;

pub use segment::{
    AlgorithmSegment, AuditStrategySegment, AuditorSegment, AutoTableRuleSegment,
    KeyGenerateSegment, NamedAlgorithmSegment, StrategySegment, TableReferenceRuleSegment,
    TableRuleDefinition, TableRuleSegment,
};
pub use statement::{RuleStatement, StrategyScope};
