use crate::{
    grid::{Grid, GridError, Topology, WrapPolicy},
    sequencer::{Queue, Sequencer},
    state::QuantumState,
    CollapseError,
};
use log::{debug, error, info};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use terra_rules::{TileRuleSet, TileType};

/// Alias for the progress callback function type.
pub type ProgressCallback = Box<dyn Fn(&ProgressInfo) + Send + Sync>;

/// A snapshot of run progress handed to the progress callback.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Iterations (select + collapse + propagate passes) completed.
    pub iterations: u64,
    /// Cells currently determined to a single tile type.
    pub collapsed_cells: usize,
    /// Total cells in the grid.
    pub total_cells: usize,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

/// Where a run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// At least one cell remains undetermined.
    Running,
    /// Every cell holds exactly one tile type.
    Complete,
    /// A cell's candidate set became empty; terminal for this run.
    Contradiction {
        /// Column of the contradictory cell.
        col: usize,
        /// Row of the contradictory cell.
        row: usize,
    },
}

/// Configuration for a collapse run.
///
/// Build one with [`EngineConfig::builder`].
pub struct EngineConfig {
    /// Seed for the run's random source. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Hard cap on main-loop iterations. `None` derives a generous
    /// default from the cell count.
    pub max_iterations: Option<u64>,
    /// Per-type selection weights biasing which tile a cell collapses
    /// to, indexed by tile ordinal. `None` means uniform choice.
    pub desired_ratios: Option<[f64; TileType::COUNT]>,
    /// Invoked after every iteration with a progress snapshot.
    pub progress_callback: Option<ProgressCallback>,
}

impl EngineConfig {
    /// Creates a new builder for `EngineConfig`.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_iterations: None,
            desired_ratios: None,
            progress_callback: None,
        }
    }
}

/// Builder for [`EngineConfig`].
#[derive(Default)]
pub struct EngineConfigBuilder {
    seed: Option<u64>,
    max_iterations: Option<u64>,
    desired_ratios: Option<[f64; TileType::COUNT]>,
    progress_callback: Option<ProgressCallback>,
}

impl EngineConfigBuilder {
    /// Sets the seed for the random number generator.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the maximum number of main-loop iterations.
    pub fn max_iterations(mut self, max: u64) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Sets the selection weight for one tile type. Types never given a
    /// ratio default to 0.0 and are only chosen when every candidate of
    /// a cell has zero weight, in which case choice falls back to
    /// uniform.
    pub fn desired_ratio(mut self, tile: TileType, ratio: f64) -> Self {
        let ratios = self
            .desired_ratios
            .get_or_insert([0.0; TileType::COUNT]);
        ratios[tile.index()] = ratio;
        self
    }

    /// Sets the progress callback function.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Builds the `EngineConfig` instance.
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            seed: self.seed,
            max_iterations: self.max_iterations,
            desired_ratios: self.desired_ratios,
            progress_callback: self.progress_callback,
        }
    }
}

/// The collapse engine: owns one grid of quantum states for the duration
/// of a run and drives it to full determination.
pub struct CollapseEngine {
    grid: Grid<QuantumState>,
    rules: TileRuleSet,
    config: EngineConfig,
    rng: StdRng,
    phase: EnginePhase,
    iterations: u64,
}

impl CollapseEngine {
    /// Creates an engine over a fresh `width` x `height` grid whose every
    /// cell starts with the full tile universe.
    pub fn new(
        rules: TileRuleSet,
        width: usize,
        height: usize,
        topology: Topology,
        wrap: WrapPolicy,
        config: EngineConfig,
    ) -> Result<Self, GridError> {
        let grid = Grid::filled(width, height, topology, wrap, QuantumState::new())?;
        Ok(Self::from_grid(rules, grid, config))
    }

    /// Creates an engine over a pre-populated grid, e.g. one with some
    /// cells already constrained by the host.
    pub fn from_grid(
        rules: TileRuleSet,
        grid: Grid<QuantumState>,
        config: EngineConfig,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let phase = if grid.cells().any(|(_, state)| state.is_uncollapsed()) {
            EnginePhase::Running
        } else {
            EnginePhase::Complete
        };
        Self {
            grid,
            rules,
            config,
            rng,
            phase,
            iterations: 0,
        }
    }

    /// The run's current phase.
    pub const fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Read access to the grid, including the partial state after a
    /// contradiction.
    pub const fn grid(&self) -> &Grid<QuantumState> {
        &self.grid
    }

    /// Consumes the engine and returns the grid.
    pub fn into_grid(self) -> Grid<QuantumState> {
        self.grid
    }

    /// Iterations completed so far.
    pub const fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Coordinates of every cell still holding more than one candidate,
    /// in row-major order.
    pub fn uncollapsed(&self) -> Vec<(usize, usize)> {
        self.grid
            .cells()
            .filter(|(_, state)| state.is_uncollapsed())
            .map(|(coord, _)| coord)
            .collect()
    }

    fn collapsed_count(&self) -> usize {
        self.grid
            .cells()
            .filter(|(_, state)| state.is_collapsed())
            .count()
    }

    /// Runs the algorithm to completion: select, collapse, propagate,
    /// repeat until no undetermined cells remain.
    ///
    /// On success the grid is fully determined and the phase is
    /// [`EnginePhase::Complete`]. On contradiction the phase records the
    /// failing coordinate and the partial grid stays inspectable through
    /// [`CollapseEngine::grid`]; the caller may retry with a new seed.
    pub fn collapse(&mut self) -> Result<(), CollapseError> {
        let start = Instant::now();
        let total_cells = self.grid.len();
        let iteration_limit = self
            .config
            .max_iterations
            .unwrap_or_else(|| (total_cells as u64).saturating_mul(TileType::COUNT as u64));
        info!(
            "Starting collapse run: {}x{} {:?} grid, wrap {:?}, iteration limit {}",
            self.grid.width(),
            self.grid.height(),
            self.grid.topology(),
            self.grid.wrap(),
            iteration_limit,
        );

        loop {
            let uncollapsed = self.uncollapsed();
            if uncollapsed.is_empty() {
                self.phase = EnginePhase::Complete;
                info!(
                    "Collapse run finished in {:?} after {} iterations",
                    start.elapsed(),
                    self.iterations
                );
                self.report_progress(total_cells, start);
                return Ok(());
            }

            self.iterations += 1;
            if self.iterations > iteration_limit {
                error!(
                    "Iteration limit {} exceeded with {} cells undetermined",
                    iteration_limit,
                    uncollapsed.len()
                );
                return Err(CollapseError::MaxIterationsReached(iteration_limit));
            }

            // Selection: uniformly random among the uncollapsed cells.
            let &(col, row) = uncollapsed
                .choose(&mut self.rng)
                .ok_or(CollapseError::Contradiction { col: 0, row: 0 })?;

            self.collapse_cell(col, row)?;
            self.propagate(col, row)?;
            self.report_progress(total_cells, start);
        }
    }

    /// Collapses the cell at `(col, row)` to one of its remaining
    /// candidates, sampled per `desired_ratios` when configured and
    /// uniformly otherwise.
    fn collapse_cell(&mut self, col: usize, row: usize) -> Result<(), CollapseError> {
        let candidates = self
            .grid
            .get(col, row)
            .ok_or(GridError::OutOfBounds { col, row })?
            .candidates();
        if candidates.is_empty() {
            return Err(CollapseError::Contradiction { col, row });
        }

        let observed = self.choose_tile(&candidates)?;
        debug!(
            "Iter {}: collapsing ({}, {}) to {:?} from {} candidates",
            self.iterations,
            col,
            row,
            observed,
            candidates.len()
        );

        let cell = self
            .grid
            .get_mut(col, row)
            .ok_or(GridError::OutOfBounds { col, row })?;
        cell.collapse(observed)?;
        Ok(())
    }

    fn choose_tile(&mut self, candidates: &[TileType]) -> Result<TileType, CollapseError> {
        if let Some(ratios) = &self.config.desired_ratios {
            let weights: Vec<f64> = candidates.iter().map(|t| ratios[t.index()]).collect();
            if weights.iter().sum::<f64>() > 0.0 {
                let dist = WeightedIndex::new(&weights)?;
                return Ok(candidates[dist.sample(&mut self.rng)]);
            }
            // Every candidate carries zero ratio; fall through to the
            // uniform choice rather than failing the run.
        }
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(CollapseError::Contradiction { col: 0, row: 0 })
    }

    /// Breadth-first propagation outward from `(col, row)`.
    ///
    /// Each dequeued cell is determined; its neighbors are pruned against
    /// the rule set using its observed type. Neighbors that become
    /// determined by pruning are enqueued so their own consequences
    /// spread. A visited set keeps wrapped topologies from cycling.
    pub fn propagate(&mut self, col: usize, row: usize) -> Result<(), CollapseError> {
        let mut visited: HashSet<(usize, usize)> = HashSet::new();
        let mut frontier: Queue<(usize, usize)> = std::iter::once((col, row)).collect();

        while let Some((c, r)) = frontier.pop() {
            visited.insert((c, r));

            let observed = self
                .grid
                .get(c, r)
                .and_then(QuantumState::observed)
                .ok_or(CollapseError::Contradiction { col: c, row: r })?;

            for (nc, nr) in self.grid.neighbor_coords(c, r) {
                if visited.contains(&(nc, nr)) {
                    continue;
                }
                let neighbor = self
                    .grid
                    .get_mut(nc, nr)
                    .ok_or(GridError::OutOfBounds { col: nc, row: nr })?;

                let removed = neighbor.remove_contrary_states(observed, &self.rules);
                if neighbor.is_contradicted() {
                    error!(
                        "Contradiction at ({}, {}) while propagating {:?} from ({}, {})",
                        nc, nr, observed, c, r
                    );
                    self.phase = EnginePhase::Contradiction { col: nc, row: nr };
                    return Err(CollapseError::Contradiction { col: nc, row: nr });
                }
                if removed > 0 && neighbor.is_collapsed() {
                    frontier.push((nc, nr));
                }
            }
        }

        Ok(())
    }

    fn report_progress(&self, total_cells: usize, start: Instant) {
        if let Some(callback) = &self.config.progress_callback {
            callback(&ProgressInfo {
                iterations: self.iterations,
                collapsed_cells: self.collapsed_count(),
                total_cells,
                elapsed: start.elapsed(),
            });
        }
    }
}
