mod renderer;
mod tile;

pub use renderer::{Renderer, lattice};
pub use tile::Tile;

use std::{
    io::{Stdout, Write},
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode, KeyEvent, KeyEventKind},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    generators::GenerationMode,
    maze::Maze,
    session::{Phase, Session, Step},
    solvers::Solver,
};

/// Front-end tunables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Maze size; the user is prompted when absent
    pub size: Option<usize>,
    /// Initial animation speed, from `MIN_SPEED` (slow) to `MAX_SPEED` (fast)
    pub speed: u8,
    /// Seed for reproducible carving
    pub seed: Option<u64>,
    /// How long to wait for input when no algorithm is running, a.k.a. how often to
    /// redraw while idle
    pub input_poll_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            size: None,
            speed: 5,
            seed: None,
            input_poll_timeout: Duration::from_millis(100),
        }
    }
}

/// Whether the app loop should keep going after handling a key
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    config: AppConfig,
    session: Session,
    renderer: Renderer,
    /// Current animation speed
    speed: u8,
    /// Flag to indicate if the animation is currently paused
    paused: bool,
    /// One-off message replacing the status line, e.g. a rejected request
    note: Option<String>,
}

impl App {
    pub const MIN_SPEED: u8 = 1;
    pub const MAX_SPEED: u8 = 10;
    /// Size suggested by the size prompt
    const DEFAULT_SIZE: usize = 20;
    const HELP: &'static str = "g: generate  i: instant  d: DFS  b: BFS  r: reset  n: new size  \
Enter: pause  →: step  ↑/↓: speed  Esc: exit";

    pub fn new(config: AppConfig) -> Self {
        let speed = config.speed.clamp(App::MIN_SPEED, App::MAX_SPEED);
        let session = Session::new(config.seed);
        Self {
            config,
            session,
            renderer: Renderer::new(),
            speed,
            paused: false,
            note: None,
        }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Delay between two steps of the running algorithm at the current speed.
    /// Solving is animated faster than carving.
    pub fn step_delay(&self) -> Duration {
        let speed = self.speed as u64;
        let millis = match self.session.phase() {
            Phase::Solving(_) => 50u64.saturating_sub(speed * 4),
            _ => 100u64.saturating_sub(speed * 9),
        };
        Duration::from_millis(millis.max(1))
    }

    /// Main application loop
    pub fn run(&mut self, stdout: &mut Stdout) -> std::io::Result<()> {
        let size = match self.config.size {
            Some(size) => size,
            None => match App::ask_maze_size(stdout)? {
                Some(size) => size,
                None => return Ok(()),
            },
        };
        if let Err(e) = self.session.create_grid(size) {
            self.note = Some(e.to_string());
        }
        stdout.execute(terminal::Clear(ClearType::All))?;

        tracing::info!("[app loop] Started main app loop");
        let mut last_step = Instant::now();
        loop {
            let running = self.session.is_running() && !self.paused;
            if running && last_step.elapsed() >= self.step_delay() {
                self.advance();
                last_step = Instant::now();
            }

            let status = self.status_line();
            self.renderer.draw(&self.session, &status, App::HELP)?;

            let timeout = if self.session.is_running() && !self.paused {
                self.step_delay().saturating_sub(last_step.elapsed())
            } else {
                self.config.input_poll_timeout
            };
            if !event::poll(timeout)? {
                continue;
            }

            match event::read()? {
                event::Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if let Flow::Quit = self.handle_key(stdout, key_event)? {
                        break;
                    }
                }
                event::Event::Resize(_, _) => self.renderer.invalidate(),
                _ => {} // Ignore other events
            }
        }
        self.session.cancel();
        tracing::info!("[app loop] Exiting main app loop");
        Ok(())
    }

    /// Advance the running algorithm by one step, noting terminal outcomes
    fn advance(&mut self) {
        let step = self.session.step();
        if step.is_done() && step != Step::Idle {
            tracing::debug!("[app loop] Run finished with {:?}", step);
        }
    }

    fn handle_key(&mut self, stdout: &mut Stdout, key_event: KeyEvent) -> std::io::Result<Flow> {
        let result = match key_event.code {
            KeyCode::Esc => {
                tracing::debug!("[app loop] Esc key pressed, exiting");
                return Ok(Flow::Quit);
            }
            KeyCode::Char('g') => self.session.generate(GenerationMode::Incremental),
            KeyCode::Char('i') => self.session.generate(GenerationMode::Instant),
            KeyCode::Char('d') => self.session.solve(Solver::Dfs),
            KeyCode::Char('b') => self.session.solve(Solver::Bfs),
            KeyCode::Char('r') => self.session.reset_solve_state().map(|_| {
                if let Some(maze) = self.session.maze() {
                    self.note = Some(format!(
                        "Maze reset - ready to solve! Size: {}x{}",
                        maze.rows(),
                        maze.cols()
                    ));
                }
            }),
            KeyCode::Char('n') => {
                // Stop whatever is running before asking for a new size
                self.session.cancel();
                self.session.step();
                stdout.execute(terminal::Clear(ClearType::All))?;
                stdout.execute(cursor::MoveTo(0, 0))?;
                let asked = App::ask_maze_size(stdout)?;
                self.renderer.invalidate();
                stdout.execute(terminal::Clear(ClearType::All))?;
                match asked {
                    Some(size) => self.session.create_grid(size).map(|_| ()),
                    None => Ok(()),
                }
            }
            KeyCode::Enter => {
                // Toggle pause state
                self.paused = !self.paused;
                Ok(())
            }
            KeyCode::Right if self.paused => {
                // Step forward when paused
                self.advance();
                Ok(())
            }
            KeyCode::Up => {
                // Speed up animation
                self.speed = (self.speed + 1).min(App::MAX_SPEED);
                Ok(())
            }
            KeyCode::Down => {
                // Slow down animation
                self.speed = self.speed.saturating_sub(1).max(App::MIN_SPEED);
                Ok(())
            }
            _ => return Ok(Flow::Continue), // Ignore other keys
        };

        match result {
            Ok(()) => {
                // A finished reset keeps its message until the next action
                if !matches!(key_event.code, KeyCode::Char('r')) {
                    self.note = None;
                }
            }
            Err(e) => {
                tracing::warn!("[app loop] Request rejected: {}", e);
                self.note = Some(e.to_string());
            }
        }
        Ok(Flow::Continue)
    }

    /// Text of the status line for the current session state
    fn status_line(&self) -> String {
        let controls = format!(
            "[speed {}/{}{}]",
            self.speed,
            App::MAX_SPEED,
            if self.paused { ", paused" } else { "" }
        );
        if let Some(note) = &self.note {
            return format!("{} {}", note, controls);
        }

        let stats = self.session.stats();
        let Some(maze) = self.session.maze() else {
            return format!("Ready to generate maze... {}", controls);
        };
        let text = match self.session.phase() {
            Phase::Empty | Phase::Walled => format!(
                "Ready to generate maze... Size: {}x{}",
                maze.rows(),
                maze.cols()
            ),
            Phase::Generating => format!(
                "Creating maze... ({}/{})",
                stats.cells_carved,
                maze.len()
            ),
            Phase::Generated => format!(
                "Maze generated. Total cells: {} | Size: {}x{}",
                stats.cells_carved,
                maze.rows(),
                maze.cols()
            ),
            Phase::Solving(solver) => format!(
                "Finding path with {}... ({} cells checked)",
                solver, stats.cells_explored
            ),
            Phase::Solved(solver) => format!(
                "SOLVED with {}! Path Length: {} | Cells Explored: {} | Efficiency: {:.1}%",
                solver,
                stats.path_length,
                stats.cells_explored,
                stats.efficiency()
            ),
            Phase::NoSolution(solver) => format!(
                "{} found no path after exploring {} cells",
                solver, stats.cells_explored
            ),
        };
        format!("{} {}", text, controls)
    }

    /// Get user input with real-time validation and feedback
    /// Returns None if user cancels input with Esc
    /// Returns Some(T) if user inputs a valid input and presses Enter, where T is the validated type
    fn prompt_with_validation<F, T>(
        stdout: &mut Stdout,
        prompt: &str,
        validate: F,
    ) -> std::io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        // Save cursor position so we can restore / redraw
        queue!(stdout, cursor::Hide, cursor::SavePosition)?;
        stdout.flush()?;

        let mut input = String::new();

        let validated = loop {
            // Re-render prompt line
            queue!(
                stdout,
                cursor::RestorePosition,
                terminal::Clear(ClearType::FromCursorDown)
            )?;

            stdout.queue(style::PrintStyledContent(
                prompt.with(Color::Cyan).attribute(Attribute::Bold),
            ))?;

            // Decide color based on validity
            let validation_result = validate(input.trim());
            match validation_result {
                Ok(_) => stdout.queue(style::SetForegroundColor(Color::Green))?,
                Err(_) => stdout.queue(style::SetForegroundColor(Color::Red))?,
            };
            queue!(
                stdout,
                style::Print(&input),
                style::ResetColor,
                style::Print(" \r\n")
            )?;

            // Error message line (if any)
            if let Err(msg) = validation_result {
                stdout.queue(style::PrintStyledContent(
                    msg.with(Color::DarkGrey).attribute(Attribute::Dim),
                ))?;
            }
            stdout.flush()?;

            if let event::Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind != KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Enter => match validate(input.trim()) {
                        Ok(value) => break Some(value),
                        Err(_) => continue,
                    },
                    KeyCode::Char(c) if !c.is_whitespace() && !c.is_control() => input.push(c),
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    // User cancelled input
                    KeyCode::Esc => break None,
                    _ => {}
                }
            }
        };
        // Cleanup
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown)
        )?;
        stdout.flush()?;

        Ok(validated)
    }

    /// Parse a maze size typed by the user. Empty input picks the default size.
    pub fn parse_size(input: &str) -> Result<usize, String> {
        if input.trim().is_empty() {
            return Ok(App::DEFAULT_SIZE);
        }
        let size = input
            .trim()
            .parse::<usize>()
            .map_err(|_| "Please enter a valid number for the size".to_string())?;
        Maze::square(size).map(|_| size).map_err(|e| e.to_string())
    }

    /// Ask user for the maze size
    /// Returns None if user cancels input with Esc
    fn ask_maze_size(stdout: &mut Stdout) -> std::io::Result<Option<usize>> {
        stdout.execute(style::PrintStyledContent(
            format!(
                "Enter maze size (between {} and {}, empty for {}), or press Esc to exit.\r\n",
                crate::maze::MIN_SIZE,
                crate::maze::MAX_SIZE,
                App::DEFAULT_SIZE
            )
            .with(Color::Blue),
        ))?;

        let size = App::prompt_with_validation(stdout, "Maze Size: ", App::parse_size)?;
        if let Some(size) = size {
            tracing::info!("[app loop] Maze size set to {}", size);
        }
        Ok(size)
    }
}
