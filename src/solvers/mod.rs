use std::rc::Rc;

mod bfs;
mod dfs;

pub use bfs::BfsSolver;
pub use dfs::DfsSolver;

use crate::{
    error::MazeError,
    maze::{Coord, Maze},
    session::RunFlag,
    stats::RunStats,
};

/// A node of a persistent path from the start cell.
///
/// Extending a path allocates one node pointing at its parent, so sibling branches
/// share their common prefix but can never modify each other's path.
#[derive(Debug)]
pub struct TrackedCell {
    /// Coordinates of the cell in the maze
    coord: Coord,
    /// The cell from which this cell was reached
    parent: Option<Rc<TrackedCell>>,
    /// Number of moves from the start cell
    traveling_cost: usize,
}

impl TrackedCell {
    /// Returns a new path that is `parent` followed by `coord`.
    pub fn extend(parent: Option<Rc<TrackedCell>>, coord: Coord) -> Rc<TrackedCell> {
        let traveling_cost = parent.as_ref().map_or(0, |p| p.traveling_cost + 1);
        Rc::new(TrackedCell {
            coord,
            parent,
            traveling_cost,
        })
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Number of cells on the path, both ends included.
    pub fn len(&self) -> usize {
        self.traveling_cost + 1
    }

    /// Walks the path from this cell back to the start.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        std::iter::successors(Some(self), |node| node.parent.as_deref()).map(|node| node.coord)
    }

    /// The path in start-to-end order.
    pub fn to_vec(&self) -> Vec<Coord> {
        let mut path = self.iter().collect::<Vec<_>>();
        path.reverse();
        path
    }
}

/// Available maze solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Dfs,
    Bfs,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
        }
    }
}

/// Outcome of a single solver step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStep {
    /// A new cell was explored and the search goes on.
    Explored(Coord),
    /// The goal was reached; the path is marked on the maze.
    Solved { path_length: usize },
    /// Every reachable cell was explored without reaching the goal.
    NoSolution,
    /// The run flag was lowered before this step; nothing was touched.
    Stopped,
}

impl SolveStep {
    /// Whether no further work remains for this run.
    pub fn is_done(&self) -> bool {
        !matches!(self, SolveStep::Explored(_))
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveStep::Solved { .. })
    }
}

/// Marks every cell of `path` as part of the solution and records its length.
fn mark_solution(maze: &mut Maze, stats: &mut RunStats, path: &TrackedCell) -> SolveStep {
    path.iter().for_each(|coord| maze.cell_mut(coord).set_in_path());
    stats.path_length = path.len();
    SolveStep::Solved {
        path_length: path.len(),
    }
}

/// A solve run with either algorithm.
pub enum SolverRun {
    Dfs(DfsSolver),
    Bfs(BfsSolver),
}

impl SolverRun {
    /// Begins a solve from the maze's start to its end. Clears the maze's solve flags
    /// and the solve counters of `stats`.
    pub fn new(solver: Solver, maze: &mut Maze, stats: &mut RunStats, run_flag: RunFlag) -> Self {
        maze.reset_flags();
        stats.reset_solve();
        tracing::info!(
            "[solve] Solving {}x{} maze with {}",
            maze.rows(),
            maze.cols(),
            solver
        );
        match solver {
            Solver::Dfs => SolverRun::Dfs(DfsSolver::new(maze, run_flag)),
            Solver::Bfs => SolverRun::Bfs(BfsSolver::new(maze, run_flag)),
        }
    }

    pub fn solver(&self) -> Solver {
        match self {
            SolverRun::Dfs(_) => Solver::Dfs,
            SolverRun::Bfs(_) => Solver::Bfs,
        }
    }

    /// Explores exactly one cell, or reports the terminal result.
    pub fn step(&mut self, maze: &mut Maze, stats: &mut RunStats) -> SolveStep {
        match self {
            SolverRun::Dfs(dfs) => dfs.step(maze, stats),
            SolverRun::Bfs(bfs) => bfs.step(maze, stats),
        }
    }

    /// The solution path in start-to-end order, once solved.
    pub fn path(&self) -> Option<Vec<Coord>> {
        match self {
            SolverRun::Dfs(dfs) => dfs.path(),
            SolverRun::Bfs(bfs) => bfs.path(),
        }
    }
}

/// Solve the maze to completion with the given algorithm.
/// Returns the solve counters, or [`MazeError::NoSolution`] if the goal is unreachable.
pub fn solve_maze(maze: &mut Maze, solver: Solver) -> Result<RunStats, MazeError> {
    let mut stats = RunStats::default();
    let mut run = SolverRun::new(solver, maze, &mut stats, RunFlag::raised());
    loop {
        match run.step(maze, &mut stats) {
            SolveStep::Explored(_) => {}
            SolveStep::Solved { .. } => return Ok(stats),
            SolveStep::NoSolution | SolveStep::Stopped => return Err(MazeError::NoSolution),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        generators::{generate_maze, get_rng},
        maze::Direction,
    };
    use std::collections::{HashMap, VecDeque};

    /// Builds the 5x5 maze whose only passages run along the top row and then down the
    /// right column.
    pub(crate) fn corridor_maze() -> Maze {
        let mut maze = Maze::square(5).unwrap();
        for col in 0..4 {
            maze.remove_wall((0, col), (0, col + 1), Direction::East);
        }
        for row in 0..4 {
            maze.remove_wall((row, 4), (row + 1, 4), Direction::South);
        }
        maze
    }

    /// Independent breadth-first distance (in cells) from start to end.
    fn distance_in_cells(maze: &Maze) -> Option<usize> {
        let mut dist = HashMap::from([(maze.start(), 1)]);
        let mut queue = VecDeque::from([maze.start()]);
        while let Some(c) = queue.pop_front() {
            let d = dist[&c];
            for n in maze.open_neighbors(c) {
                dist.entry(n).or_insert_with(|| {
                    queue.push_back(n);
                    d + 1
                });
            }
        }
        dist.get(&maze.end()).copied()
    }

    #[test]
    fn test_tracked_cell_branches_are_independent() {
        let root = TrackedCell::extend(None, (0, 0));
        let mid = TrackedCell::extend(Some(root.clone()), (0, 1));
        let left = TrackedCell::extend(Some(mid.clone()), (1, 1));
        let right = TrackedCell::extend(Some(mid), (0, 2));
        assert_eq!(left.to_vec(), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(right.to_vec(), vec![(0, 0), (0, 1), (0, 2)]);
        assert_eq!(right.len(), 3);
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_bfs_is_optimal_and_never_longer_than_dfs() {
        for seed in 0..30 {
            let size = 5 + seed as usize % 20;
            let mut maze = Maze::square(size).unwrap();
            generate_maze(&mut maze, get_rng(Some(seed)));

            let bfs = solve_maze(&mut maze, Solver::Bfs).unwrap();
            let dfs = solve_maze(&mut maze, Solver::Dfs).unwrap();

            assert_eq!(Some(bfs.path_length), distance_in_cells(&maze));
            assert!(bfs.path_length <= dfs.path_length);
            // In a perfect maze there is only one simple path
            assert_eq!(bfs.path_length, dfs.path_length);
        }
    }

    #[test]
    fn test_corridor_scenario() {
        let mut maze = corridor_maze();
        let bfs = solve_maze(&mut maze, Solver::Bfs).unwrap();
        assert_eq!(bfs.path_length, 9);
        assert_eq!(bfs.cells_explored, 9);

        let dfs = solve_maze(&mut maze, Solver::Dfs).unwrap();
        assert_eq!(dfs.path_length, 9);
        assert_eq!(dfs.cells_explored, 9);

        let on_path = maze.coords().filter(|&c| maze[c].in_path()).count();
        assert_eq!(on_path, 9);
        assert!(maze[(0, 3)].in_path() && maze[(3, 4)].in_path());
        assert!(!maze[(2, 2)].in_path());
    }

    #[test]
    fn test_unreachable_goal_reports_no_solution() {
        for solver in [Solver::Dfs, Solver::Bfs] {
            let mut maze = corridor_maze();
            // Cut the corridor in half
            let mut cut = Maze::square(5).unwrap();
            for col in 0..4 {
                cut.remove_wall((0, col), (0, col + 1), Direction::East);
            }
            assert_eq!(solve_maze(&mut cut, solver), Err(MazeError::NoSolution));
            assert_eq!(cut.visited_count(), 5);
            assert!(solve_maze(&mut maze, solver).is_ok());
        }
    }

    #[test]
    fn test_solve_resets_previous_flags() {
        let mut maze = Maze::square(10).unwrap();
        generate_maze(&mut maze, get_rng(Some(21)));
        let first = solve_maze(&mut maze, Solver::Dfs).unwrap();
        let second = solve_maze(&mut maze, Solver::Dfs).unwrap();
        assert_eq!(first, second);
        assert_eq!(maze.visited_count(), second.cells_explored);
    }
}
