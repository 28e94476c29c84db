use rand::{Rng, SeedableRng, rngs::StdRng};

mod recur_backtrack;

pub use recur_backtrack::RecursiveBacktracker;

use crate::{
    maze::{Coord, Direction, Maze},
    session::RunFlag,
    stats::RunStats,
};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// How a generation run is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Carve the whole maze synchronously before returning.
    Instant,
    /// Carve one step per call to `step`.
    Incremental,
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::Instant => write!(f, "Instant"),
            GenerationMode::Incremental => write!(f, "Step-by-step"),
        }
    }
}

/// Outcome of a single generator step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenStep {
    /// A new cell was connected to the maze by removing the wall between `from` and `to`.
    Carved {
        from: Coord,
        to: Coord,
        direction: Direction,
    },
    /// The walk had nowhere to go and fell back to `to`.
    Backtracked { to: Coord },
    /// The stack emptied: the maze is complete. Returned for every later call too.
    Finished,
    /// The run flag was lowered before this step; nothing was touched.
    Stopped,
}

impl GenStep {
    /// Whether no further work remains for this run.
    pub fn is_done(&self) -> bool {
        matches!(self, GenStep::Finished | GenStep::Stopped)
    }
}

/// Carve a perfect maze to completion in one go, returning the run's counters.
///
/// The maze must be freshly created (all walls present).
pub fn generate_maze<R: Rng>(maze: &mut Maze, rng: R) -> RunStats {
    let mut stats = RunStats::default();
    let mut generator = RecursiveBacktracker::new(maze, &mut stats, rng, RunFlag::raised());
    while !generator.step(maze, &mut stats).is_done() {}
    stats
}
