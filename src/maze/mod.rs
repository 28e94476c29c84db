pub mod cell;

pub use cell::{Cell, Direction, Walls};

use crate::error::MazeError;

/// Cell coordinate as `(row, col)`.
pub type Coord = (u8, u8);

/// Smallest accepted number of rows or columns.
pub const MIN_SIZE: usize = 5;
/// Largest accepted number of rows or columns.
pub const MAX_SIZE: usize = 50;

/// The rows x cols cell matrix. Owns every cell for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Box<[Cell]>,
    rows: u8,
    cols: u8,
}

impl Maze {
    /// Creates a fully walled maze with all flags cleared.
    ///
    /// Fails with [`MazeError::InvalidSize`] unless both dimensions are within
    /// [`MIN_SIZE`]..=[`MAX_SIZE`].
    pub fn new(rows: usize, cols: usize) -> Result<Self, MazeError> {
        let valid = MIN_SIZE..=MAX_SIZE;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(MazeError::InvalidSize { rows, cols });
        }
        let cells = vec![Cell::default(); rows * cols].into_boxed_slice();
        Ok(Maze {
            cells,
            // Both fit in u8 since MAX_SIZE < u8::MAX
            rows: rows as u8,
            cols: cols as u8,
        })
    }

    /// Creates a square maze of `size x size` cells.
    pub fn square(size: usize) -> Result<Self, MazeError> {
        Maze::new(size, size)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Top-left cell, where every run begins.
    pub fn start(&self) -> Coord {
        (0, 0)
    }

    /// Bottom-right cell, the solvers' goal.
    pub fn end(&self) -> Coord {
        (self.rows - 1, self.cols - 1)
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        coord.0 as usize * self.cols as usize + coord.1 as usize
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let idx = self.ravel_index(coord);
        &mut self.cells[idx]
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (rows, cols) = (self.rows, self.cols);
        (0..rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }

    /// Returns the coordinate next to `coord` in `direction`, or `None` if it falls
    /// outside the maze.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let (row, col) = coord;
        // NOTE: wrapping_sub turns -1 into u8::MAX and saturating_add caps at u8::MAX.
        // Both land outside the maze since the largest dimension is MAX_SIZE.
        let next = match direction {
            Direction::North => (row.wrapping_sub(1), col),
            Direction::South => (row.saturating_add(1), col),
            Direction::East => (row, col.saturating_add(1)),
            Direction::West => (row, col.wrapping_sub(1)),
        };
        self.is_in_bounds(next).then_some(next)
    }

    /// In-bounds neighbors reachable from `coord` through a removed wall, in N, S, E, W
    /// order.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self[coord]
            .walls()
            .open_directions()
            .filter_map(move |d| self.neighbor(coord, d))
    }

    /// Removes the wall of `a` facing `direction` and the wall of `b` facing back.
    ///
    /// The caller guarantees `b` is the neighbor of `a` in `direction`; no bounds or
    /// adjacency check is performed here.
    pub fn remove_wall(&mut self, a: Coord, b: Coord, direction: Direction) {
        self.cell_mut(a).remove_wall(direction);
        self.cell_mut(b).remove_wall(direction.opposite());
    }

    /// Clears the solve flags (`visited`, `in_path`) of every cell. Walls and carving
    /// state are untouched, so this is safe to call between solve attempts.
    pub fn reset_flags(&mut self) {
        self.cells.iter_mut().for_each(Cell::clear_solve_flags);
    }

    /// Number of removed wall pairs, counting each passage once.
    pub fn passage_count(&self) -> usize {
        self.coords()
            .map(|coord| {
                [Direction::South, Direction::East]
                    .into_iter()
                    .filter(|&d| self.neighbor(coord, d).is_some() && !self[coord].has_wall(d))
                    .count()
            })
            .sum()
    }

    /// Number of cells whose solve `visited` flag is set.
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_visited()).count()
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[self.ravel_index(index)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_boundaries() {
        assert_eq!(
            Maze::square(4),
            Err(MazeError::InvalidSize { rows: 4, cols: 4 })
        );
        assert_eq!(
            Maze::square(51),
            Err(MazeError::InvalidSize { rows: 51, cols: 51 })
        );
        assert!(Maze::new(5, 50).is_ok());
        assert!(Maze::square(5).is_ok());
        assert!(Maze::square(50).is_ok());
        assert!(Maze::new(5, 4).is_err());
    }

    #[test]
    fn test_new_maze_is_fully_walled() {
        let maze = Maze::new(5, 7).unwrap();
        assert_eq!(maze.len(), 35);
        assert_eq!(maze.start(), (0, 0));
        assert_eq!(maze.end(), (4, 6));
        assert_eq!(maze.passage_count(), 0);
        assert!(maze.coords().all(|c| maze[c] == Cell::default()));
    }

    #[test]
    fn test_out_of_bounds() {
        let maze = Maze::square(5).unwrap();
        assert!(!maze.is_in_bounds((5, 5)));
        assert!(!maze.is_in_bounds((0, 5)));
        assert!(!maze.is_in_bounds((5, 0)));
        assert!(maze.is_in_bounds((4, 4)));
    }

    #[test]
    fn test_neighbor_at_edges() {
        let maze = Maze::square(5).unwrap();
        assert_eq!(maze.neighbor((0, 0), Direction::North), None);
        assert_eq!(maze.neighbor((0, 0), Direction::West), None);
        assert_eq!(maze.neighbor((0, 0), Direction::South), Some((1, 0)));
        assert_eq!(maze.neighbor((0, 0), Direction::East), Some((0, 1)));
        assert_eq!(maze.neighbor((4, 4), Direction::South), None);
        assert_eq!(maze.neighbor((4, 4), Direction::East), None);
        assert_eq!(maze.neighbor((2, 3), Direction::North), Some((1, 3)));
    }

    #[test]
    fn test_remove_wall_is_symmetric() {
        let mut maze = Maze::square(5).unwrap();
        maze.remove_wall((1, 1), (1, 2), Direction::East);
        assert!(!maze[(1, 1)].has_wall(Direction::East));
        assert!(!maze[(1, 2)].has_wall(Direction::West));
        assert!(maze[(1, 1)].has_wall(Direction::North));
        assert_eq!(maze.passage_count(), 1);
        assert_eq!(maze.open_neighbors((1, 2)).collect::<Vec<_>>(), vec![(1, 1)]);
    }

    #[test]
    fn test_reset_flags_keeps_walls() {
        let mut maze = Maze::square(5).unwrap();
        maze.remove_wall((0, 0), (1, 0), Direction::South);
        maze.cell_mut((0, 0)).set_visited();
        maze.cell_mut((1, 0)).set_in_path();
        maze.cell_mut((1, 0)).set_carved();
        let walls_before = maze.coords().map(|c| maze[c].walls()).collect::<Vec<_>>();

        maze.reset_flags();
        let once = maze.clone();
        maze.reset_flags();

        assert_eq!(maze, once);
        assert!(maze.coords().all(|c| !maze[c].is_visited() && !maze[c].in_path()));
        assert!(maze[(1, 0)].is_carved());
        let walls_after = maze.coords().map(|c| maze[c].walls()).collect::<Vec<_>>();
        assert_eq!(walls_before, walls_after);
    }
}
