//! Loading rule sets from RON definitions.
//!
//! A rule set file lists one entry per tile type, each mapping neighbor
//! names to raw weights:
//!
//! ```ron
//! (
//!     rules: [
//!         (tile: "ocean", neighbors: { "ocean": 1.0, "sand": 1.0 }),
//!         (tile: "sand", neighbors: { "ocean": 1.0, "sand": 1.0 }),
//!         // ...
//!     ],
//! )
//! ```
//!
//! Weights are normalized by [`TileRule`] construction, so the raw values
//! only need to be non-negative with a positive sum per entry.

use crate::types::{RuleSetError, TileRule, TileRuleSet, TileType};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a rule set definition.
#[derive(Error, Debug)]
pub enum LoadError {
    /// I/O failure reading the definition file.
    #[error("I/O error reading rule set file: {0}")]
    Io(#[from] std::io::Error),
    /// The RON text did not parse.
    #[error("failed to parse RON rule set: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// A rule referenced a tile name outside the known universe.
    #[error("unknown tile type name: {0:?}")]
    UnknownTile(String),
    /// The parsed rules violated a rule-set invariant.
    #[error("invalid rule data: {0}")]
    InvalidRules(#[from] RuleSetError),
}

#[derive(Deserialize, Debug, Clone)]
struct RuleSetDef {
    rules: Vec<RuleDef>,
}

#[derive(Deserialize, Debug, Clone)]
struct RuleDef {
    tile: String,
    neighbors: HashMap<String, f32>,
}

fn parse_tile(name: &str) -> Result<TileType, LoadError> {
    TileType::from_name(name).ok_or_else(|| LoadError::UnknownTile(name.to_string()))
}

/// Parses a rule set from RON text.
pub fn from_ron_str(text: &str) -> Result<TileRuleSet, LoadError> {
    let def: RuleSetDef = ron::de::from_str(text)?;
    debug!("Parsed rule set definition with {} rules", def.rules.len());

    let mut rules = Vec::with_capacity(def.rules.len());
    for rule_def in def.rules {
        let root = parse_tile(&rule_def.tile)?;
        let mut neighbors = Vec::with_capacity(rule_def.neighbors.len());
        for (name, weight) in rule_def.neighbors {
            neighbors.push((parse_tile(&name)?, weight));
        }
        rules.push(TileRule::new(root, neighbors)?);
    }

    Ok(TileRuleSet::new(rules)?)
}

/// Loads a rule set from a RON file on disk.
pub fn load_from_file(path: &Path) -> Result<TileRuleSet, LoadError> {
    debug!("Loading rule set from {}", path.display());
    let text = fs::read_to_string(path)?;
    from_ron_str(&text)
}
