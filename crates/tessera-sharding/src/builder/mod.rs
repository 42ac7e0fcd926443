//! Configuration delta builders.
//!
//! A builder converts a statement that already passed its checker into a
//! [`RuleDelta`](crate::delta::RuleDelta) fragment. Builders are read-only
//! over the catalog and infallible: every failure mode was rejected upstream.

pub mod algorithm;
pub mod broadcast;
pub(crate) mod convert;
pub mod default_strategy;
pub mod reference;
pub mod table;
