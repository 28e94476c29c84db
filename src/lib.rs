//! Step-by-step perfect maze generation (randomized depth-first carving) and solving
//! (depth-first and breadth-first search), with a terminal front-end.

pub mod app;
pub mod error;
pub mod generators;
pub mod maze;
pub mod session;
pub mod solvers;
pub mod stats;

pub use error::MazeError;
pub use generators::GenerationMode;
pub use maze::{Coord, Maze};
pub use session::{RunFlag, Session, Step};
pub use solvers::Solver;
pub use stats::RunStats;
