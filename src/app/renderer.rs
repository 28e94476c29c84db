use std::io::{Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    app::tile::Tile,
    maze::{Cell, Coord, Direction, Maze},
    session::Session,
};

/// Lattice of tiles for the maze, row-major, `(2 * cols + 1)` tiles wide.
pub fn lattice(maze: &Maze, head: Option<Coord>) -> Vec<Tile> {
    let width = 2 * maze.cols() as usize + 1;
    let height = 2 * maze.rows() as usize + 1;
    let mut tiles = vec![Tile::Wall; width * height];

    for coord in maze.coords() {
        let y = 2 * coord.0 as usize + 1;
        let x = 2 * coord.1 as usize + 1;
        tiles[y * width + x] = cell_tile(maze, coord, head);

        // Each passage is drawn once, from the cell above or left of it
        for (direction, dy, dx) in [(Direction::South, 1, 0), (Direction::East, 0, 1)] {
            if maze[coord].has_wall(direction) {
                continue;
            }
            if let Some(next) = maze.neighbor(coord, direction) {
                tiles[(y + dy) * width + x + dx] = passage_tile(&maze[coord], &maze[next]);
            }
        }
    }
    tiles
}

fn cell_tile(maze: &Maze, coord: Coord, head: Option<Coord>) -> Tile {
    let cell = &maze[coord];
    if coord == maze.start() {
        Tile::Start
    } else if coord == maze.end() {
        Tile::Goal
    } else if cell.in_path() {
        Tile::Route
    } else if head == Some(coord) {
        Tile::Head
    } else if cell.is_visited() {
        Tile::Visited
    } else if cell.is_carved() {
        Tile::Open
    } else {
        Tile::Uncarved
    }
}

fn passage_tile(a: &Cell, b: &Cell) -> Tile {
    if a.in_path() && b.in_path() {
        Tile::Route
    } else if a.is_visited() && b.is_visited() {
        Tile::Visited
    } else {
        Tile::Open
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Lattice dimensions (width, height) in tiles of the last drawn frame
    lattice_dims: Option<(u16, u16)>,
    /// Tiles of the last drawn frame, only changed tiles are redrawn
    previous: Vec<Tile>,
    /// Whether the last frame was replaced by the terminal-too-small message
    too_small: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

impl Renderer {
    /// Rows below the maze reserved for the status and help lines
    pub const NUM_STATUS_ROWS: u16 = 2;

    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            lattice_dims: None,
            previous: Vec::new(),
            too_small: false,
        }
    }

    /// Forget the last frame so the next draw repaints everything, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.lattice_dims = None;
        self.previous.clear();
    }

    /// Check if terminal size is sufficient for the given lattice dimensions.
    /// If not, display a message once and return Ok(false).
    fn check_size(&mut self, width: u16, height: u16) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        if term_width >= width * Tile::CELL_WIDTH && term_height >= height + Self::NUM_STATUS_ROWS
        {
            return Ok(true);
        }
        if !self.too_small {
            tracing::debug!(
                "[render] Terminal {}x{} too small for {}x{} lattice",
                term_width,
                term_height,
                width,
                height
            );
            let msg = format!(
                "Terminal size is too small ({}x{}) for the maze ({}x{} needed). Please resize the terminal or press Esc to exit.",
                term_width,
                term_height,
                width * Tile::CELL_WIDTH,
                height + Self::NUM_STATUS_ROWS
            );
            queue!(
                self.stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            )?;
            self.stdout.flush()?;
            self.too_small = true;
            self.invalidate();
        }
        Ok(false)
    }

    /// Draw the session's maze, redrawing only the tiles that changed since the last
    /// frame, followed by the status and help lines.
    pub fn draw(&mut self, session: &Session, status: &str, help: &str) -> std::io::Result<()> {
        let Some(maze) = session.maze() else {
            queue!(
                self.stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
            self.invalidate();
            return self.draw_status_lines(0, status, help);
        };

        let width = 2 * maze.cols() as u16 + 1;
        let height = 2 * maze.rows() as u16 + 1;
        if !self.check_size(width, height)? {
            return Ok(());
        }

        if self.too_small || self.lattice_dims != Some((width, height)) {
            queue!(self.stdout, terminal::Clear(ClearType::All))?;
            self.previous.clear();
            self.lattice_dims = Some((width, height));
            self.too_small = false;
        }

        let tiles = lattice(maze, session.generation_head());
        for (i, tile) in tiles.iter().enumerate() {
            if self.previous.get(i) == Some(tile) {
                continue;
            }
            let x = (i % width as usize) as u16;
            let y = (i / width as usize) as u16;
            queue!(
                self.stdout,
                cursor::MoveTo(x * Tile::CELL_WIDTH, y),
                style::Print(tile)
            )?;
        }
        self.previous = tiles;

        self.draw_status_lines(height, status, help)
    }

    fn draw_status_lines(&mut self, row: u16, status: &str, help: &str) -> std::io::Result<()> {
        let term_width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        let (status, _) = status.unicode_truncate(term_width);
        let (help, _) = help.unicode_truncate(term_width);
        queue!(
            self.stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(Color::Cyan).attribute(Attribute::Bold)),
            cursor::MoveTo(0, row + 1),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(help.with(Color::DarkGrey)),
        )?;
        self.stdout.flush()
    }
}
