use bitvec::prelude::*;
use terra_rules::{TileRuleSet, TileType};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors from mutating a [`QuantumState`] outside its contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The given tile is not among the remaining candidates.
    #[error("tile {0:?} is not a remaining candidate")]
    NotACandidate(TileType),
}

/// A cell's remaining candidate tile types.
///
/// Candidates are stored as a bitset indexed by tile ordinal. The set
/// starts at the full tile universe and only ever shrinks; it reaching
/// zero is the contradiction condition the engine checks for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuantumState {
    candidates: BitVec,
}

impl QuantumState {
    /// A state holding the full tile universe.
    pub fn new() -> Self {
        Self {
            candidates: bitvec![1; TileType::COUNT],
        }
    }

    /// A state holding only the given candidates.
    pub fn with_candidates(tiles: &[TileType]) -> Self {
        let mut candidates = bitvec![0; TileType::COUNT];
        for tile in tiles {
            candidates.set(tile.index(), true);
        }
        Self { candidates }
    }

    /// Number of remaining candidates.
    #[inline]
    pub fn count(&self) -> usize {
        self.candidates.count_ones()
    }

    /// Whether `tile` is still a candidate.
    #[inline]
    pub fn contains(&self, tile: TileType) -> bool {
        self.candidates[tile.index()]
    }

    /// Whether the state is determined (exactly one candidate).
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.count() == 1
    }

    /// Whether the state is still undetermined (more than one candidate).
    #[inline]
    pub fn is_uncollapsed(&self) -> bool {
        self.count() > 1
    }

    /// Whether the candidate set is empty.
    #[inline]
    pub fn is_contradicted(&self) -> bool {
        self.candidates.not_any()
    }

    /// The first remaining candidate in ordinal order, or `None` for a
    /// contradicted state. For a collapsed state this is the committed
    /// tile type.
    pub fn observed(&self) -> Option<TileType> {
        self.candidates.first_one().and_then(TileType::from_index)
    }

    /// The remaining candidates in ordinal order.
    pub fn candidates(&self) -> Vec<TileType> {
        self.candidates
            .iter_ones()
            .filter_map(TileType::from_index)
            .collect()
    }

    /// Commits the state to `chosen`, which must be a current candidate.
    pub fn collapse(&mut self, chosen: TileType) -> Result<(), StateError> {
        if !self.contains(chosen) {
            return Err(StateError::NotACandidate(chosen));
        }
        self.candidates.fill(false);
        self.candidates.set(chosen.index(), true);
        Ok(())
    }

    /// Removes one candidate, which must currently be present.
    pub fn remove_state(&mut self, tile: TileType) -> Result<(), StateError> {
        if !self.contains(tile) {
            return Err(StateError::NotACandidate(tile));
        }
        self.candidates.set(tile.index(), false);
        Ok(())
    }

    /// Removes every candidate the rule set forbids next to an observed
    /// neighbor of type `observed`. Returns how many were removed.
    ///
    /// This is the propagation primitive; it never fails, and the caller
    /// is responsible for checking [`QuantumState::is_contradicted`]
    /// afterwards.
    pub fn remove_contrary_states(&mut self, observed: TileType, rules: &TileRuleSet) -> usize {
        let mut removed = 0;
        for tile in TileType::ALL {
            if self.contains(tile) && !rules.is_allowed_neighbor(observed, tile) {
                self.candidates.set(tile.index(), false);
                removed += 1;
            }
        }
        removed
    }
}

impl Default for QuantumState {
    fn default() -> Self {
        Self::new()
    }
}
