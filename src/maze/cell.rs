use std::fmt;

/// One of the four cardinal directions a cell can open towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed exploration order used by both solvers: N, S, E, W.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The direction pointing back at the cell we came from.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Row and column offsets of this direction.
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    /// Bit used for this direction in a [`Walls`] mask.
    const fn bit(self) -> u8 {
        match self {
            Direction::North => Walls::NORTH.0,
            Direction::South => Walls::SOUTH.0,
            Direction::East => Walls::EAST.0,
            Direction::West => Walls::WEST.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        };
        write!(f, "{}", letter)
    }
}

/// Wall bitmask of a cell. A set bit means the wall on that side is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Walls(u8);

impl Walls {
    pub const NONE: Walls = Walls(0);
    pub const NORTH: Walls = Walls(0b0001);
    pub const SOUTH: Walls = Walls(0b0010);
    pub const EAST: Walls = Walls(0b0100);
    pub const WEST: Walls = Walls(0b1000);
    pub const ALL: Walls = Walls(0b1111);

    /// Raw bitmask, for renderers that want to index a glyph table.
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn has(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    pub fn remove(&mut self, direction: Direction) {
        self.0 &= !direction.bit();
    }

    /// Directions without a wall, in N, S, E, W order.
    pub fn open_directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| !self.has(d))
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::ALL
    }
}

/// A single cell of the maze.
///
/// Generation and solving keep separate flags: `carved` belongs to the generator,
/// `visited` and `in_path` belong to the solvers and are the only flags cleared by
/// [`Maze::reset_flags`](crate::maze::Maze::reset_flags).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    walls: Walls,
    carved: bool,
    visited: bool,
    in_path: bool,
}

impl Cell {
    pub fn walls(&self) -> Walls {
        self.walls
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls.has(direction)
    }

    /// Whether the generator has already connected this cell to the maze.
    pub fn is_carved(&self) -> bool {
        self.carved
    }

    /// Whether a solver has explored this cell during the current solve.
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Whether this cell lies on the final solution path.
    pub fn in_path(&self) -> bool {
        self.in_path
    }

    pub(crate) fn remove_wall(&mut self, direction: Direction) {
        self.walls.remove(direction);
    }

    pub(crate) fn set_carved(&mut self) {
        self.carved = true;
    }

    pub(crate) fn set_visited(&mut self) {
        self.visited = true;
    }

    pub(crate) fn set_in_path(&mut self) {
        self.in_path = true;
    }

    pub(crate) fn clear_solve_flags(&mut self) {
        self.visited = false;
        self.in_path = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cell_is_fully_walled() {
        let cell = Cell::default();
        assert_eq!(cell.walls(), Walls::ALL);
        assert!(Direction::ALL.iter().all(|&d| cell.has_wall(d)));
        assert!(!cell.is_carved() && !cell.is_visited() && !cell.in_path());
    }

    #[test]
    fn test_open_directions_keep_fixed_order() {
        let mut walls = Walls::ALL;
        walls.remove(Direction::West);
        walls.remove(Direction::North);
        assert_eq!(
            walls.open_directions().collect::<Vec<_>>(),
            vec![Direction::North, Direction::West]
        );
        assert_eq!(walls.bits(), Walls::SOUTH.bits() | Walls::EAST.bits());
    }

    #[test]
    fn test_opposite_offsets_cancel() {
        for d in Direction::ALL {
            let (dr, dc) = d.offset();
            let (or, oc) = d.opposite().offset();
            assert_eq!((dr + or, dc + oc), (0, 0));
            assert_eq!(d.opposite().opposite(), d);
        }
    }
}
