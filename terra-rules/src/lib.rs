//! Tile vocabulary and adjacency rules for terramap generation.
//!
//! This crate declares the closed set of tile types a map can contain and
//! the weighted adjacency rules that say which types may sit next to which.
//! Rule sets are immutable after construction and are consumed by the
//! collapse engine in `terra-core`.

/// Rule-set loading from RON definitions.
#[cfg(feature = "serde")]
pub mod loader;
/// Tile types, rules, and rule sets.
pub mod types;

#[cfg(feature = "serde")]
pub use crate::loader::LoadError;
pub use crate::types::{island_rule_set, RuleSetError, TileRule, TileRuleSet, TileType};
