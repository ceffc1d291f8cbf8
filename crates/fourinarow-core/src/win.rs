//! Win detection

use crate::board::{Board, COLUMNS, Coord, ROWS};

/// Number of same-colored cells in a winning line
pub const LINE_LENGTH: u8 = 4;

/// Four contiguous same-colored cells, in scan order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine(pub [Coord; LINE_LENGTH as usize]);

impl WinningLine {
    pub fn cells(&self) -> &[Coord] {
        &self.0
    }
}

/// Directions in the order they are scanned. Each entry holds the
/// column/row step and the ranges of valid starting positions.
const DIRECTIONS: [(i8, i8, [u8; 2], [u8; 2]); 4] = [
    // horizontal
    (1, 0, [0, COLUMNS - 3], [0, ROWS]),
    // vertical
    (0, 1, [0, COLUMNS], [0, ROWS - 3]),
    // diagonal, down and to the right
    (1, 1, [0, COLUMNS - 3], [0, ROWS - 3]),
    // diagonal, down and to the left (scanned from its lower-left end)
    (1, -1, [0, COLUMNS - 3], [3, ROWS]),
];

/// Find a line of four same-colored pieces
///
/// Horizontal lines are checked first, then vertical, then the two
/// diagonals. Within a direction, start positions are visited column by
/// column. The first line found wins, so the result is deterministic when
/// several lines exist at once.
pub fn find_winning_line(board: &Board) -> Option<WinningLine> {
    for (dx, dy, columns, rows) in DIRECTIONS {
        for column in columns[0]..columns[1] {
            for row in rows[0]..rows[1] {
                if let Some(line) = line_at(board, Coord::new(column, row), dx, dy) {
                    return Some(line);
                }
            }
        }
    }
    None
}

fn line_at(board: &Board, start: Coord, dx: i8, dy: i8) -> Option<WinningLine> {
    let first = board.get(start.column, start.row);
    if first.is_empty() {
        return None;
    }

    let mut line = [start; LINE_LENGTH as usize];
    for (i, slot) in line.iter_mut().enumerate().skip(1) {
        let step = i as i8;
        let coord = Coord::new(
            (start.column as i8 + dx * step) as u8,
            (start.row as i8 + dy * step) as u8,
        );
        if board.get(coord.column, coord.row) != first {
            return None;
        }
        *slot = coord;
    }
    Some(WinningLine(line))
}
