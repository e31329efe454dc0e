//! Core library for constraint-propagation tile map generation.
//!
//! A [`CollapseEngine`] owns a [`Grid`] of [`QuantumState`]s and a
//! [`terra_rules::TileRuleSet`]. It repeatedly picks an undetermined cell,
//! commits it to one tile type, and walks the consequences outward through
//! the grid's topology until every cell is determined or a contradiction
//! proves the run impossible.

use rand::distributions::WeightedError;
use thiserror::Error;

/// The collapse/propagation engine.
pub mod engine;
/// Generic 2D grid with topology and wrap-policy aware neighbor lookup.
pub mod grid;
/// Ordered worklists driving propagation and traversal.
pub mod sequencer;
/// Per-cell candidate sets.
pub mod state;

pub use crate::engine::{CollapseEngine, EngineConfig, EnginePhase, ProgressInfo};
pub use crate::grid::{Grid, GridError, Topology, WrapPolicy};
pub use crate::sequencer::{PriorityQueue, Queue, Sequencer, Stack};
pub use crate::state::{QuantumState, StateError};

/// Errors that can occur during a collapse run.
#[derive(Error, Debug)]
pub enum CollapseError {
    /// A cell's candidate set became empty during propagation. Terminal
    /// for the run; the caller may retry with a different seed.
    #[error("contradiction at ({col}, {row}): no candidate tiles remain")]
    Contradiction {
        /// Column of the contradictory cell.
        col: usize,
        /// Row of the contradictory cell.
        row: usize,
    },
    /// A grid shape or access error.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    /// A quantum state was mutated outside its contract.
    #[error("quantum state error: {0}")]
    State(#[from] StateError),
    /// The engine exceeded the configured iteration budget.
    #[error("maximum iterations ({0}) reached")]
    MaxIterationsReached(u64),
    /// Ratio-weighted tile selection failed.
    #[error("weighted selection error: {0}")]
    WeightedChoice(#[from] WeightedError),
}
