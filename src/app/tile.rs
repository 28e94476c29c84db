use crossterm::style::{Color, Stylize};

use std::fmt;

/// What a single terminal tile of the rendered maze shows.
///
/// The maze is drawn on a `(2 * rows + 1) x (2 * cols + 1)` lattice: cells sit on odd
/// coordinates, walls and passages between them on the even ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    /// A carved cell or passage nothing has explored yet.
    Open,
    /// A cell the generator has not reached yet.
    Uncarved,
    /// The generator's current cell.
    Head,
    Start,
    Goal,
    /// Explored by the solver.
    Visited,
    /// On the solution path.
    Route,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    const WALL: Color = Color::Rgb {
        r: 0x2c,
        g: 0x3e,
        b: 0x50,
    };
    const ENDPOINT: Color = Color::Rgb {
        r: 0xff,
        g: 0x00,
        b: 0xff,
    };
    const VISITED: Color = Color::Rgb {
        r: 0x56,
        g: 0xb6,
        b: 0xf7,
    };
    const ROUTE: Color = Color::Rgb {
        r: 0xff,
        g: 0x00,
        b: 0x00,
    };
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            Tile::Wall => "  ".on(Tile::WALL),
            Tile::Open => "  ".on(Color::White),
            Tile::Uncarved => "··".with(Color::DarkGrey).on(Color::Black),
            Tile::Head => "  ".on(Color::Green),
            Tile::Start => "S ".with(Color::White).on(Tile::ENDPOINT),
            Tile::Goal => "G ".with(Color::White).on(Tile::ENDPOINT),
            Tile::Visited => "  ".on(Tile::VISITED),
            Tile::Route => "  ".on(Tile::ROUTE),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::CELL_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tile_renders() {
        let tiles = [
            Tile::Wall,
            Tile::Open,
            Tile::Uncarved,
            Tile::Head,
            Tile::Start,
            Tile::Goal,
            Tile::Visited,
            Tile::Route,
        ];
        for tile in tiles {
            assert!(!tile.to_string().is_empty());
        }
    }
}
