use rand::Rng;

use crate::{
    generators::GenStep,
    maze::{Coord, Direction, Maze},
    session::RunFlag,
    stats::RunStats,
};

/// Randomized depth-first carving, one step at a time.
///
/// Every carve connects a not-yet-carved cell to the carved component, so the
/// passages always form a tree; the walk only ends once the stack is empty, by which
/// point every cell of the (connected) grid has been carved.
pub struct RecursiveBacktracker<R> {
    /// Path of the walk from the start cell to the current head
    stack: Vec<Coord>,
    rng: R,
    run_flag: RunFlag,
    finished: bool,
}

impl<R: Rng> RecursiveBacktracker<R> {
    /// Begins a generation run on a fully walled maze: marks the start cell carved and
    /// puts it on the stack. Resets all of `stats`.
    pub fn new(maze: &mut Maze, stats: &mut RunStats, rng: R, run_flag: RunFlag) -> Self {
        stats.reset();
        let start = maze.start();
        maze.cell_mut(start).set_carved();
        stats.cells_carved = 1;
        tracing::info!(
            "[generate] Starting recursive backtracker on {}x{} maze",
            maze.rows(),
            maze.cols()
        );
        RecursiveBacktracker {
            stack: vec![start],
            rng,
            run_flag,
            finished: false,
        }
    }

    /// The cell the walk is currently standing on, if the run is still going.
    pub fn head(&self) -> Option<Coord> {
        self.stack.last().copied()
    }

    /// Performs exactly one carve or one backtrack.
    pub fn step(&mut self, maze: &mut Maze, stats: &mut RunStats) -> GenStep {
        if self.finished {
            return GenStep::Finished;
        }
        if !self.run_flag.is_raised() {
            return GenStep::Stopped;
        }

        let Some(&current) = self.stack.last() else {
            return self.finish(stats);
        };
        stats.generation_steps += 1;

        let candidates = Direction::ALL
            .into_iter()
            .filter_map(|d| maze.neighbor(current, d).map(|n| (d, n)))
            .filter(|&(_, n)| !maze[n].is_carved())
            .collect::<Vec<_>>();

        if !candidates.is_empty() {
            let (direction, next) = candidates[self.rng.random_range(0..candidates.len())];
            maze.remove_wall(current, next, direction);
            maze.cell_mut(next).set_carved();
            stats.cells_carved += 1;
            // Carve further in that neighbor's direction on the next step
            self.stack.push(next);
            tracing::debug!("[generate] Carved {:?} -> {:?}", current, next);
            return GenStep::Carved {
                from: current,
                to: next,
                direction,
            };
        }

        // Dead end, fall back to the previous cell
        self.stack.pop();
        match self.stack.last() {
            Some(&previous) => GenStep::Backtracked { to: previous },
            None => self.finish(stats),
        }
    }

    fn finish(&mut self, stats: &RunStats) -> GenStep {
        self.finished = true;
        self.run_flag.lower();
        tracing::info!(
            "[generate] Maze generated: {} cells carved in {} steps",
            stats.cells_carved,
            stats.generation_steps
        );
        GenStep::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;
    use std::collections::{HashSet, VecDeque};

    fn generate(rows: usize, cols: usize, seed: u64) -> Maze {
        let mut maze = Maze::new(rows, cols).unwrap();
        crate::generators::generate_maze(&mut maze, get_rng(Some(seed)));
        maze
    }

    /// Flood fill over passages from the start cell, returning the reached cells.
    fn flood_fill(maze: &Maze) -> HashSet<Coord> {
        let mut seen = HashSet::from([maze.start()]);
        let mut queue = VecDeque::from([maze.start()]);
        while let Some(c) = queue.pop_front() {
            for n in maze.open_neighbors(c) {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    #[test]
    fn test_spanning_tree_property() {
        for seed in 0..40 {
            let rows = 5 + (seed as usize % 7);
            let cols = 5 + (seed as usize * 3 % 11);
            let maze = generate(rows, cols, seed);
            // n - 1 edges and connected means no cycle
            assert_eq!(maze.passage_count(), rows * cols - 1);
            assert_eq!(flood_fill(&maze).len(), rows * cols);
            assert!(maze.coords().all(|c| maze[c].is_carved()));
        }
    }

    #[test]
    fn test_removing_any_passage_disconnects() {
        let maze = generate(6, 6, 11);
        for coord in maze.coords() {
            for d in [Direction::South, Direction::East] {
                let Some(n) = maze.neighbor(coord, d) else {
                    continue;
                };
                if maze[coord].has_wall(d) {
                    continue;
                }
                // Re-wall the passage by rebuilding the maze without it
                let mut cut = Maze::new(6, 6).unwrap();
                for c in maze.coords() {
                    for dd in [Direction::South, Direction::East] {
                        if let Some(nn) = maze.neighbor(c, dd)
                            && !maze[c].has_wall(dd)
                            && (c, nn) != (coord, n)
                        {
                            cut.remove_wall(c, nn, dd);
                        }
                    }
                }
                assert!(flood_fill(&cut).len() < 36);
            }
        }
    }

    #[test]
    fn test_wall_symmetry() {
        for seed in 0..20 {
            let maze = generate(9, 7, seed);
            for c in maze.coords() {
                for d in Direction::ALL {
                    if let Some(n) = maze.neighbor(c, d) {
                        assert_eq!(maze[c].has_wall(d), maze[n].has_wall(d.opposite()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_outer_walls_stay_intact() {
        let maze = generate(8, 8, 5);
        for c in maze.coords() {
            for d in Direction::ALL {
                if maze.neighbor(c, d).is_none() {
                    assert!(maze[c].has_wall(d));
                }
            }
        }
    }

    #[test]
    fn test_carved_cells_stay_connected_during_generation() {
        let mut maze = Maze::square(7).unwrap();
        let mut stats = RunStats::default();
        let mut generator =
            RecursiveBacktracker::new(&mut maze, &mut stats, get_rng(Some(9)), RunFlag::raised());
        loop {
            let step = generator.step(&mut maze, &mut stats);
            let carved = maze.coords().filter(|&c| maze[c].is_carved()).count();
            assert_eq!(flood_fill(&maze).len(), carved);
            assert_eq!(stats.cells_carved, carved);
            if step.is_done() {
                assert_eq!(step, GenStep::Finished);
                break;
            }
        }
        assert_eq!(generator.head(), None);
        // Later calls keep reporting completion without touching the maze
        let snapshot = maze.clone();
        assert_eq!(generator.step(&mut maze, &mut stats), GenStep::Finished);
        assert_eq!(maze, snapshot);
    }

    #[test]
    fn test_stops_when_flag_lowered() {
        let mut maze = Maze::square(5).unwrap();
        let mut stats = RunStats::default();
        let flag = RunFlag::raised();
        let mut generator =
            RecursiveBacktracker::new(&mut maze, &mut stats, get_rng(Some(1)), flag.clone());
        assert!(matches!(
            generator.step(&mut maze, &mut stats),
            GenStep::Carved { from: (0, 0), .. }
        ));
        flag.lower();
        let snapshot = maze.clone();
        let stats_before = stats;
        assert_eq!(generator.step(&mut maze, &mut stats), GenStep::Stopped);
        assert_eq!(maze, snapshot);
        assert_eq!(stats, stats_before);
    }
}
