use std::{collections::VecDeque, rc::Rc};

use super::{SolveStep, TrackedCell, mark_solution};
use crate::{
    maze::{Coord, Maze},
    session::RunFlag,
    stats::RunStats,
};

/// Breadth-first search, one explored cell per step.
///
/// Cells are marked visited when dequeued, so the first dequeue of a cell wins and
/// later duplicates are skipped without being counted. Since the queue is drained in
/// non-decreasing distance order, the path attached to the goal on its first dequeue
/// is a shortest one.
pub struct BfsSolver {
    queue: VecDeque<(Coord, Option<Rc<TrackedCell>>)>,
    goal: Coord,
    solution: Option<Rc<TrackedCell>>,
    result: Option<SolveStep>,
    run_flag: RunFlag,
}

impl BfsSolver {
    pub fn new(maze: &Maze, run_flag: RunFlag) -> Self {
        BfsSolver {
            queue: VecDeque::from([(maze.start(), None)]),
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

    /// Number of entries waiting in the queue.
    pub fn frontier_len(&self) -> usize {
        self.queue.len()
    }

    pub fn step(&mut self, maze: &mut Maze, stats: &mut RunStats) -> SolveStep {
        if let Some(result) = self.result {
            return result;
        }
        if !self.run_flag.is_raised() {
            return SolveStep::Stopped;
        }

        while let Some((coord, parent)) = self.queue.pop_front() {
            if maze[coord].is_visited() {
                continue;
            }

            maze.cell_mut(coord).set_visited();
            stats.cells_explored += 1;
            let path = TrackedCell::extend(parent, coord);

            if coord == self.goal {
                let result = mark_solution(maze, stats, &path);
                tracing::info!(
                    "[bfs] Goal reached: path length {}, {} cells explored",
                    stats.path_length,
                    stats.cells_explored
                );
                self.solution = Some(path);
                return self.finish(result);
            }

            let next = maze
                .open_neighbors(coord)
                .filter(|&n| !maze[n].is_visited())
                .collect::<Vec<_>>();
            self.queue
                .extend(next.into_iter().map(|n| (n, Some(path.clone()))));
            tracing::debug!("[bfs] Explored {:?}", coord);
            return SolveStep::Explored(coord);
        }

        tracing::info!(
            "[bfs] No path found after exploring {} cells",
            stats.cells_explored
        );
        self.finish(SolveStep::NoSolution)
    }

    fn finish(&mut self, result: SolveStep) -> SolveStep {
        self.queue.clear();
        self.result = Some(result);
        self.run_flag.lower();
        result
    }
}
