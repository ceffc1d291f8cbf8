//! Board and cell types

use crate::pix::{Pix, color};

/// Number of columns on the board
pub const COLUMNS: u8 = 7;

/// Number of rows on the board
pub const ROWS: u8 = 6;

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    /// Moves first, drawn green
    One,
    /// Moves second, drawn red
    Two,
}

impl Player {
    /// The player whose turn comes next
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Palette index used to draw this player's pieces
    pub fn color(self) -> u8 {
        match self {
            Player::One => color::GREEN,
            Player::Two => color::RED,
        }
    }
}

/// Contents of a single board cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Taken(player) => Some(player),
        }
    }

    pub fn color(self) -> u8 {
        self.player().map_or(color::OFF, Player::color)
    }
}

/// A board position. Column 0 is leftmost, row 0 is topmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub column: u8,
    pub row: u8,
}

impl Coord {
    pub const fn new(column: u8, row: u8) -> Self {
        Self { column, row }
    }
}

impl From<(u8, u8)> for Coord {
    fn from((column, row): (u8, u8)) -> Self {
        Self::new(column, row)
    }
}

/// The 7x6 grid of cells
///
/// Pieces fall toward row 5. As long as cells are only filled through
/// [`Board::place`], every column is a contiguous run of taken cells
/// ending at the bottom row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; COLUMNS as usize * ROWS as usize],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; COLUMNS as usize * ROWS as usize],
        }
    }

    fn index(column: u8, row: u8) -> usize {
        debug_assert!(column < COLUMNS, "column {column} out of range");
        debug_assert!(row < ROWS, "row {row} out of range");
        row as usize * COLUMNS as usize + column as usize
    }

    /// Cell at `(column, row)`. Both indices must be inside the grid.
    pub fn get(&self, column: u8, row: u8) -> Cell {
        self.cells[Self::index(column, row)]
    }

    /// Overwrite the cell at `(column, row)`. Both indices must be inside the grid.
    pub fn set(&mut self, column: u8, row: u8, cell: Cell) {
        let index = Self::index(column, row);
        debug_assert!(
            !(cell.is_empty() && !self.cells[index].is_empty()),
            "taken cells are never cleared within a match"
        );
        self.cells[index] = cell;
    }

    /// Row a piece dropped into `column` would land on, or `None` if the column is full
    pub fn drop_target(&self, column: u8) -> Option<u8> {
        let stacked = (0..ROWS)
            .take_while(|&row| self.get(column, row).is_empty())
            .count() as u8;
        stacked.checked_sub(1)
    }

    /// Drop a piece for `player` into `column`, returning where it landed
    pub fn place(&mut self, column: u8, player: Player) -> Option<Coord> {
        let row = self.drop_target(column)?;
        self.set(column, row, Cell::Taken(player));
        Some(Coord::new(column, row))
    }

    /// Whether every column is full
    pub fn is_full(&self) -> bool {
        (0..COLUMNS).all(|column| self.drop_target(column).is_none())
    }

    /// Number of taken cells
    pub fn pieces(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Render the board as a 7x6 pixel buffer
    pub fn pixels(&self) -> Pix {
        let mut pix = Pix::new(COLUMNS, ROWS);
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                pix.set_pixel(column, row, self.get(column, row).color());
            }
        }
        pix
    }
}
