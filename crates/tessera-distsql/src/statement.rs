//! Rule definition statements.
//!
//! One struct per administrative operation, folded into the closed
//! [`RuleStatement`] enum the engine dispatches on. Statements are plain
//! values: the parser fills them in, the engine validates them against the
//! current catalog.

use serde::{Deserialize, Serialize};

use crate::segment::{
    NamedAlgorithmSegment, StrategySegment, TableReferenceRuleSegment, TableRuleDefinition,
};

/// Which catalog-wide default a default-strategy statement targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyScope {
    /// The default database (data-source routing) strategy.
    Database,
    /// The default table (physical table routing) strategy.
    Table,
}

impl StrategyScope {
    /// Lowercase label used in synthesized algorithm names and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            StrategyScope::Database => "database",
            StrategyScope::Table => "table",
        }
    }
}

/// `CREATE SHARDING TABLE RULE [IF NOT EXISTS] ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShardingTableRule {
    pub if_not_exists: bool,
    pub rules: Vec<TableRuleDefinition>,
}

/// `ALTER SHARDING TABLE RULE ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterShardingTableRule {
    pub rules: Vec<TableRuleDefinition>,
}

/// `DROP SHARDING TABLE RULE [IF EXISTS] t_order, ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropShardingTableRule {
    pub if_exists: bool,
    pub tables: Vec<String>,
}

/// `CREATE SHARDING TABLE REFERENCE RULE [IF NOT EXISTS] ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShardingTableReferenceRule {
    pub if_not_exists: bool,
    pub rules: Vec<TableReferenceRuleSegment>,
}

/// `ALTER SHARDING TABLE REFERENCE RULE ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterShardingTableReferenceRule {
    pub rules: Vec<TableReferenceRuleSegment>,
}

/// `DROP SHARDING TABLE REFERENCE RULE [IF EXISTS] ref_0, ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropShardingTableReferenceRule {
    pub if_exists: bool,
    pub names: Vec<String>,
}

/// `CREATE DEFAULT SHARDING DATABASE|TABLE STRATEGY [IF NOT EXISTS] (...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDefaultShardingStrategy {
    pub if_not_exists: bool,
    pub scope: StrategyScope,
    pub strategy: StrategySegment,
}

/// `ALTER DEFAULT SHARDING DATABASE|TABLE STRATEGY (...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterDefaultShardingStrategy {
    pub scope: StrategyScope,
    pub strategy: StrategySegment,
}

/// `DROP DEFAULT SHARDING DATABASE|TABLE STRATEGY [IF EXISTS]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropDefaultShardingStrategy {
    pub if_exists: bool,
    pub scope: StrategyScope,
}

/// `CREATE SHARDING ALGORITHM [IF NOT EXISTS] name (...), ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShardingAlgorithm {
    pub if_not_exists: bool,
    pub algorithms: Vec<NamedAlgorithmSegment>,
}

/// `ALTER SHARDING ALGORITHM name (...), ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterShardingAlgorithm {
    pub algorithms: Vec<NamedAlgorithmSegment>,
}

/// `DROP SHARDING ALGORITHM [IF EXISTS] name, ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropShardingAlgorithm {
    pub if_exists: bool,
    pub names: Vec<String>,
}

/// `CREATE SHARDING KEY GENERATOR [IF NOT EXISTS] name (...), ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShardingKeyGenerator {
    pub if_not_exists: bool,
    pub key_generators: Vec<NamedAlgorithmSegment>,
}

/// `ALTER SHARDING KEY GENERATOR name (...), ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterShardingKeyGenerator {
    pub key_generators: Vec<NamedAlgorithmSegment>,
}

/// `DROP SHARDING KEY GENERATOR [IF EXISTS] name, ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropShardingKeyGenerator {
    pub if_exists: bool,
    pub names: Vec<String>,
}

/// `CREATE SHARDING AUDITOR [IF NOT EXISTS] name (...), ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateShardingAuditor {
    pub if_not_exists: bool,
    pub auditors: Vec<NamedAlgorithmSegment>,
}

/// `ALTER SHARDING AUDITOR name (...), ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterShardingAuditor {
    pub auditors: Vec<NamedAlgorithmSegment>,
}

/// `DROP SHARDING AUDITOR [IF EXISTS] name, ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropShardingAuditor {
    pub if_exists: bool,
    pub names: Vec<String>,
}

/// `CREATE BROADCAST TABLE RULE [IF NOT EXISTS] (t_dict, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBroadcastTableRule {
    pub if_not_exists: bool,
    pub tables: Vec<String>,
}

/// `ALTER BROADCAST TABLE RULE (t_dict, ...)` — replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterBroadcastTableRule {
    pub tables: Vec<String>,
}

/// `DROP BROADCAST TABLE RULE [IF EXISTS] t_dict, ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropBroadcastTableRule {
    pub if_exists: bool,
    pub tables: Vec<String>,
}

/// Closed set of rule definition statements the engine accepts.
///
/// Dispatch is a single `match`; there is no runtime registration of
/// per-statement executors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::large_enum_variant)]
pub enum RuleStatement {
    CreateShardingTableRule(CreateShardingTableRule),
    AlterShardingTableRule(AlterShardingTableRule),
    DropShardingTableRule(DropShardingTableRule),
    CreateShardingTableReferenceRule(CreateShardingTableReferenceRule),
    AlterShardingTableReferenceRule(AlterShardingTableReferenceRule),
    DropShardingTableReferenceRule(DropShardingTableReferenceRule),
    CreateDefaultShardingStrategy(CreateDefaultShardingStrategy),
    AlterDefaultShardingStrategy(AlterDefaultShardingStrategy),
    DropDefaultShardingStrategy(DropDefaultShardingStrategy),
    CreateShardingAlgorithm(CreateShardingAlgorithm),
    AlterShardingAlgorithm(AlterShardingAlgorithm),
    DropShardingAlgorithm(DropShardingAlgorithm),
    CreateShardingKeyGenerator(CreateShardingKeyGenerator),
    AlterShardingKeyGenerator(AlterShardingKeyGenerator),
    DropShardingKeyGenerator(DropShardingKeyGenerator),
    CreateShardingAuditor(CreateShardingAuditor),
    AlterShardingAuditor(AlterShardingAuditor),
    DropShardingAuditor(DropShardingAuditor),
    CreateBroadcastTableRule(CreateBroadcastTableRule),
    AlterBroadcastTableRule(AlterBroadcastTableRule),
    DropBroadcastTableRule(DropBroadcastTableRule),
}

impl RuleStatement {
    /// Statement kind label, for logging and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RuleStatement::CreateShardingTableRule(_) => "CREATE SHARDING TABLE RULE",
            RuleStatement::AlterShardingTableRule(_) => "ALTER SHARDING TABLE RULE",
            RuleStatement::DropShardingTableRule(_) => "DROP SHARDING TABLE RULE",
            RuleStatement::CreateShardingTableReferenceRule(_) => {
                "CREATE SHARDING TABLE REFERENCE RULE"
            }
            RuleStatement::AlterShardingTableReferenceRule(_) => {
                "ALTER SHARDING TABLE REFERENCE RULE"
            }
            RuleStatement::DropShardingTableReferenceRule(_) => "DROP SHARDING TABLE REFERENCE RULE",
            RuleStatement::CreateDefaultShardingStrategy(_) => "CREATE DEFAULT SHARDING STRATEGY",
            RuleStatement::AlterDefaultShardingStrategy(_) => "ALTER DEFAULT SHARDING STRATEGY",
            RuleStatement::DropDefaultShardingStrategy(_) => "DROP DEFAULT SHARDING STRATEGY",
            RuleStatement::CreateShardingAlgorithm(_) => "CREATE SHARDING ALGORITHM",
            RuleStatement::AlterShardingAlgorithm(_) => "ALTER SHARDING ALGORITHM",
            RuleStatement::DropShardingAlgorithm(_) => "DROP SHARDING ALGORITHM",
            RuleStatement::CreateShardingKeyGenerator(_) => "CREATE SHARDING KEY GENERATOR",
            RuleStatement::AlterShardingKeyGenerator(_) => "ALTER SHARDING KEY GENERATOR",
            RuleStatement::DropShardingKeyGenerator(_) => "DROP SHARDING KEY GENERATOR",
            RuleStatement::CreateShardingAuditor(_) => "CREATE SHARDING AUDITOR",
            RuleStatement::AlterShardingAuditor(_) => "ALTER SHARDING AUDITOR",
            RuleStatement::DropShardingAuditor(_) => "DROP SHARDING AUDITOR",
            RuleStatement::CreateBroadcastTableRule(_) => "CREATE BROADCAST TABLE RULE",
            RuleStatement::AlterBroadcastTableRule(_) => "ALTER BROADCAST TABLE RULE",
            RuleStatement::DropBroadcastTableRule(_) => "DROP BROADCAST TABLE RULE",
        }
    }
}
