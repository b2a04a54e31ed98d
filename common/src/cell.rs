use itertools::iproduct;
use std::fmt;

/// A coordinate on the minesweeper grid.
///
/// Cells order row-major, so any ordered set of cells iterates top to bottom,
/// left to right.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    pub fn in_bounds(&self, height: usize, width: usize) -> bool {
        self.row < height && self.col < width
    }

    /// All valid neighbor coordinates of this cell on a `height` x `width` grid.
    /// Edges and corners yield fewer than eight; the cell itself is never included.
    pub fn neighbors(self, height: usize, width: usize) -> impl Iterator<Item = Cell> {
        iproduct!(-1isize..=1, -1isize..=1).filter_map(move |(dr, dc)| {
            if dr == 0 && dc == 0 {
                return None;
            }

            let r = self.row as isize + dr;
            let c = self.col as isize + dc;

            if r >= 0 && r < height as isize && c >= 0 && c < width as isize {
                Some(Cell {
                    row: r as usize,
                    col: c as usize,
                })
            } else {
                None
            }
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Every cell of a `height` x `width` grid in row-major order.
pub fn all_cells(height: usize, width: usize) -> impl Iterator<Item = Cell> {
    iproduct!(0..height, 0..width).map(|(row, col)| Cell { row, col })
}
