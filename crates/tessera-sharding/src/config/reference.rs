//! Table reference (binding) group configuration.

use serde::{Deserialize, Serialize};

/// A group of logical tables declared to shard in lockstep.
///
/// Mirrors the statement segment shape: a group name and a comma-joined
/// member list. Member identity is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReferenceRuleConfig {
    /// Group name.
    pub name: String,
    /// Comma-joined logical table names.
    pub reference: String,
}

impl TableReferenceRuleConfig {
    /// Create a reference group config.
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
        }
    }

    /// Member table names, trimmed, original spelling.
    pub fn member_tables(&self) -> Vec<&str> {
        self.reference
            .split(',')
            .map(str::trim)
            .filter(|table| !table.is_empty())
            .collect()
    }

    /// Whether the group contains a table, ignoring case.
    pub fn contains_table(&self, table: &str) -> bool {
        self.member_tables()
            .iter()
            .any(|member| member.eq_ignore_ascii_case(table))
    }
}
