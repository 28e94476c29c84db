use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    error::MazeError,
    generators::{GenStep, GenerationMode, RecursiveBacktracker, get_rng},
    maze::{Coord, Maze},
    solvers::{SolveStep, Solver, SolverRun},
    stats::RunStats,
};

/// Shared flag telling whether a generation or solve run is in flight.
///
/// Lowering it cancels the run: the next step returns without mutating anything.
/// Cloning shares the flag, so an input thread may hold a copy to cancel with.
#[derive(Debug, Clone, Default)]
pub struct RunFlag(Arc<AtomicBool>);

impl RunFlag {
    /// A lowered flag: nothing is running.
    pub fn new() -> Self {
        RunFlag::default()
    }

    /// A raised flag, for driving a stepper directly.
    pub fn raised() -> Self {
        let flag = RunFlag::new();
        flag.raise();
        flag
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn lower(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The run currently in flight.
enum ActiveRun {
    Generate(RecursiveBacktracker<StdRng>),
    Solve(SolverRun),
}

/// What a call to [`Session::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// No run was active.
    Idle,
    Generate(GenStep),
    Solve(SolveStep),
}

impl Step {
    /// Whether the run is over (or there was none), so the caller can stop stepping.
    pub fn is_done(&self) -> bool {
        match self {
            Step::Idle => true,
            Step::Generate(step) => step.is_done(),
            Step::Solve(step) => step.is_done(),
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Step::Solve(step) if step.is_solved())
    }
}

/// Phase of the session, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No grid yet.
    Empty,
    /// A grid exists but is not a complete maze: fresh, or its generation was stopped.
    Walled,
    Generating,
    Generated,
    Solving(Solver),
    Solved(Solver),
    NoSolution(Solver),
}

/// The stepping API consumed by a front-end: owns the grid, the active run, its
/// counters and the run flag.
pub struct Session {
    maze: Option<Maze>,
    stats: RunStats,
    run_flag: RunFlag,
    active: Option<ActiveRun>,
    phase: Phase,
    solution: Option<Vec<Coord>>,
    /// Whether the grid holds a complete maze
    generated: bool,
    /// Seeds every generation run; drawn from, so each run carves a different maze
    rng: StdRng,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(None)
    }
}

impl Session {
    /// Creates an empty session. With a seed, the sequence of generated mazes is
    /// reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Session {
            maze: None,
            stats: RunStats::default(),
            run_flag: RunFlag::new(),
            active: None,
            phase: Phase::Empty,
            solution: None,
            generated: false,
            rng: get_rng(seed),
        }
    }

    /// A handle to the run flag, e.g. for cancelling from another thread.
    pub fn run_flag(&self) -> RunFlag {
        self.run_flag.clone()
    }

    pub fn is_running(&self) -> bool {
        self.run_flag.is_raised()
    }

    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The generator's current cell while an incremental generation is running.
    pub fn generation_head(&self) -> Option<Coord> {
        match &self.active {
            Some(ActiveRun::Generate(generator)) => generator.head(),
            _ => None,
        }
    }

    /// The path found by the last solve, in start-to-end order.
    pub fn solution(&self) -> Option<&[Coord]> {
        self.solution.as_deref()
    }

    fn ensure_idle(&self) -> Result<(), MazeError> {
        if self.is_running() {
            tracing::warn!("[session] Rejected request: an algorithm is already running");
            return Err(MazeError::AlreadyRunning);
        }
        Ok(())
    }

    /// Replaces the grid with a fully walled `size x size` one and clears all counters.
    /// On error nothing is changed.
    pub fn create_grid(&mut self, size: usize) -> Result<&Maze, MazeError> {
        self.ensure_idle()?;
        let maze = Maze::square(size).inspect_err(|e| tracing::warn!("[session] {}", e))?;
        tracing::info!("[session] Created {}x{} grid", size, size);
        self.active = None;
        self.solution = None;
        self.stats.reset();
        self.generated = false;
        self.phase = Phase::Walled;
        Ok(self.maze.insert(maze))
    }

    /// Starts carving a new maze on a fresh grid of the current dimensions.
    ///
    /// In [`GenerationMode::Instant`] the maze is complete when this returns; in
    /// [`GenerationMode::Incremental`] call [`Session::step`] until it reports done.
    pub fn generate(&mut self, mode: GenerationMode) -> Result<(), MazeError> {
        self.ensure_idle()?;
        let current = self.maze.as_ref().ok_or(MazeError::NoGrid)?;
        let mut maze = Maze::new(current.rows() as usize, current.cols() as usize)?;

        self.run_flag.raise();
        let mut generator = RecursiveBacktracker::new(
            &mut maze,
            &mut self.stats,
            StdRng::from_rng(&mut self.rng),
            self.run_flag.clone(),
        );
        self.solution = None;
        self.generated = false;

        match mode {
            GenerationMode::Instant => {
                while !generator.step(&mut maze, &mut self.stats).is_done() {}
                self.active = None;
                self.generated = true;
                self.phase = Phase::Generated;
            }
            GenerationMode::Incremental => {
                self.active = Some(ActiveRun::Generate(generator));
                self.phase = Phase::Generating;
            }
        }
        self.maze = Some(maze);
        Ok(())
    }

    /// Clears the solve flags and counters without touching walls. Stops any run in
    /// flight first.
    pub fn reset_solve_state(&mut self) -> Result<(), MazeError> {
        let maze = self.maze.as_mut().ok_or(MazeError::NoGrid)?;
        if self.run_flag.is_raised() {
            tracing::info!("[session] Reset requested while running, stopping run");
            self.run_flag.lower();
        }
        maze.reset_flags();
        self.stats.reset_solve();
        self.phase = self.idle_phase();
        self.active = None;
        self.solution = None;
        Ok(())
    }

    /// The phase to fall back to once no run is active.
    fn idle_phase(&self) -> Phase {
        match (&self.maze, self.generated) {
            (None, _) => Phase::Empty,
            (Some(_), true) => Phase::Generated,
            // Fresh, or an interrupted generation left a partial maze behind
            (Some(_), false) => Phase::Walled,
        }
    }

    /// Starts solving the current grid from its start to its end cell.
    pub fn solve(&mut self, solver: Solver) -> Result<(), MazeError> {
        self.ensure_idle()?;
        let maze = self.maze.as_mut().ok_or(MazeError::NoGrid)?;
        self.run_flag.raise();
        let run = SolverRun::new(solver, maze, &mut self.stats, self.run_flag.clone());
        self.solution = None;
        self.active = Some(ActiveRun::Solve(run));
        self.phase = Phase::Solving(solver);
        Ok(())
    }

    /// Lowers the run flag. The active run stops at its next step.
    pub fn cancel(&self) {
        if self.run_flag.is_raised() {
            tracing::info!("[session] Cancelling active run");
            self.run_flag.lower();
        }
    }

    /// Advances the active run by one unit of work.
    pub fn step(&mut self) -> Step {
        let (Some(maze), Some(active)) = (self.maze.as_mut(), self.active.as_mut()) else {
            return Step::Idle;
        };

        match active {
            ActiveRun::Generate(generator) => {
                let step = generator.step(maze, &mut self.stats);
                match step {
                    GenStep::Finished => {
                        self.generated = true;
                        self.phase = Phase::Generated;
                        self.active = None;
                    }
                    GenStep::Stopped => {
                        tracing::info!("[session] Generation stopped");
                        self.phase = Phase::Walled;
                        self.active = None;
                    }
                    _ => {}
                }
                Step::Generate(step)
            }
            ActiveRun::Solve(run) => {
                let solver = run.solver();
                let step = run.step(maze, &mut self.stats);
                match step {
                    SolveStep::Explored(_) => return Step::Solve(step),
                    SolveStep::Solved { .. } => {
                        self.solution = run.path();
                        self.phase = Phase::Solved(solver);
                    }
                    SolveStep::NoSolution => self.phase = Phase::NoSolution(solver),
                    SolveStep::Stopped => {
                        tracing::info!("[session] Solve stopped");
                        self.phase = self.idle_phase();
                    }
                }
                self.active = None;
                Step::Solve(step)
            }
        }
    }

    /// Drives the active run to completion, returning the final step.
    pub fn run_to_end(&mut self) -> Step {
        loop {
            let step = self.step();
            if step.is_done() {
                return step;
            }
        }
    }
}
