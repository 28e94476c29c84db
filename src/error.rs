use thiserror::Error;

/// Errors reported by the maze core to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MazeError {
    /// A requested dimension is outside the supported range. Nothing was mutated.
    #[error(
        "invalid maze size {rows}x{cols}: each dimension must be between {min} and {max}",
        min = crate::maze::MIN_SIZE,
        max = crate::maze::MAX_SIZE
    )]
    InvalidSize { rows: usize, cols: usize },
    /// A generation or solve is already in flight.
    #[error("an algorithm is already running, reset or wait for it to finish")]
    AlreadyRunning,
    /// Generation or solving was requested before any grid exists.
    #[error("no maze grid exists yet, create one first")]
    NoGrid,
    /// The solver exhausted every reachable cell without reaching the goal.
    #[error("no path exists between start and goal")]
    NoSolution,
}
