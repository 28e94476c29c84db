use std::rc::Rc;

use super::{SolveStep, TrackedCell, mark_solution};
use crate::{
    maze::{Coord, Maze},
    session::RunFlag,
    stats::RunStats,
};

/// Depth-first search, one explored cell per step.
///
/// The pending stack holds the calls a recursive search would still make: a cell
/// paired with the path that leads to it. Branches are pushed in reverse N, S, E, W
/// order, so they are popped (and fully explored) in N, S, E, W order, and a branch
/// that dead-ends is simply dropped, leaving its siblings' paths intact.
///
/// The goal cell counts as explored when it is reached, as it does for BFS, so a
/// search that walks straight down the solution reports 100% efficiency.
pub struct DfsSolver {
    pending: Vec<(Coord, Option<Rc<TrackedCell>>)>,
    goal: Coord,
    solution: Option<Rc<TrackedCell>>,
    result: Option<SolveStep>,
    run_flag: RunFlag,
}

impl DfsSolver {
    pub fn new(maze: &Maze, run_flag: RunFlag) -> Self {
        DfsSolver {
            pending: vec![(maze.start(), None)],
            goal: maze.end(),
            solution: None,
            result: None,
            run_flag,
        }
    }

    /// The solution path in start-to-end order, once solved.
    pub fn path(&self) -> Option<Vec<Coord>> {
        self.solution.as_ref().map(|path| path.to_vec())
    }

    pub fn step(&mut self, maze: &mut Maze, stats: &mut RunStats) -> SolveStep {
        if let Some(result) = self.result {
            return result;
        }
        if !self.run_flag.is_raised() {
            return SolveStep::Stopped;
        }

        while let Some((coord, parent)) = self.pending.pop() {
            if coord == self.goal {
                maze.cell_mut(coord).set_visited();
                stats.cells_explored += 1;
                let path = TrackedCell::extend(parent, coord);
                let result = mark_solution(maze, stats, &path);
                tracing::info!(
                    "[dfs] Goal reached: path length {}, {} cells explored",
                    stats.path_length,
                    stats.cells_explored
                );
                self.solution = Some(path);
                return self.finish(result);
            }

            // Already explored through another branch, this call fails immediately
            if maze[coord].is_visited() {
                continue;
            }

            maze.cell_mut(coord).set_visited();
            stats.cells_explored += 1;
            let path = TrackedCell::extend(parent, coord);

            let branches = maze.open_neighbors(coord).collect::<Vec<_>>();
            self.pending.extend(
                branches
                    .into_iter()
                    .rev()
                    .map(|next| (next, Some(path.clone()))),
            );
            tracing::debug!("[dfs] Explored {:?}", coord);
            return SolveStep::Explored(coord);
        }

        tracing::info!(
            "[dfs] No path found after exploring {} cells",
            stats.cells_explored
        );
        self.finish(SolveStep::NoSolution)
    }

    fn finish(&mut self, result: SolveStep) -> SolveStep {
        self.pending.clear();
        self.result = Some(result);
        self.run_flag.lower();
        result
    }
}
