/// Counters of the current generation and solve run, read-only to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Cells connected to the maze so far, including the start cell.
    pub cells_carved: usize,
    /// Generator steps taken, carving and backtracking alike.
    pub generation_steps: usize,
    /// Cells explored by the solver.
    pub cells_explored: usize,
    /// Number of cells on the solution path, 0 until solved.
    pub path_length: usize,
}

impl RunStats {
    /// Clears every counter, for a fresh generation.
    pub fn reset(&mut self) {
        *self = RunStats::default();
    }

    /// Clears the solve counters only, keeping the generation counters.
    pub fn reset_solve(&mut self) {
        self.cells_explored = 0;
        self.path_length = 0;
    }

    /// Passages carved so far. A finished maze has one fewer than it has cells.
    pub fn walls_removed(&self) -> usize {
        self.cells_carved.saturating_sub(1)
    }

    /// Path length as a percentage of the cells explored, or 0 before anything was
    /// explored.
    pub fn efficiency(&self) -> f64 {
        if self.cells_explored == 0 {
            return 0.0;
        }
        self.path_length as f64 / self.cells_explored as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_without_exploration_is_zero() {
        let stats = RunStats {
            path_length: 9,
            ..Default::default()
        };
        assert_eq!(stats.efficiency(), 0.0);
    }

    #[test]
    fn test_efficiency_ratio() {
        let stats = RunStats {
            cells_explored: 20,
            path_length: 9,
            ..Default::default()
        };
        assert!((stats.efficiency() - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_solve_keeps_generation_counters() {
        let mut stats = RunStats {
            cells_carved: 25,
            generation_steps: 49,
            cells_explored: 12,
            path_length: 9,
        };
        stats.reset_solve();
        assert_eq!(stats.cells_carved, 25);
        assert_eq!(stats.walls_removed(), 24);
        assert_eq!(stats.cells_explored, 0);
        assert_eq!(stats.path_length, 0);
        stats.reset();
        assert_eq!(stats, RunStats::default());
    }
}
