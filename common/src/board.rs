use crate::cell::{Cell, all_cells};
use rand::Rng;
use rand::prelude::IndexedRandom;
use std::collections::BTreeSet;
use std::fmt;

/// Answers questions about a hidden minefield.
pub trait Oracle {
    fn height(&self) -> usize;

    fn width(&self) -> usize;

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.in_bounds(self.height(), self.width())
    }

    /// The number of mines among the in-bounds neighbors of `cell`.
    fn neighbor_mine_count(&self, cell: Cell) -> usize;
}

/// The minefield itself, plus the cells the player has flagged.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Board {
    height: usize,
    width: usize,
    mines: BTreeSet<Cell>,
    /// Cells flagged as mines. The game is won once this matches `mines`.
    flagged: BTreeSet<Cell>,
}

impl Board {
    /// Places `mines` mines uniformly at random.
    pub fn new<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut R,
    ) -> anyhow::Result<Self> {
        let Some(total) = height.checked_mul(width) else {
            anyhow::bail!("A {height}x{width} board has too many cells.");
        };
        if mines >= total {
            anyhow::bail!("Total mines must be less than the number of cells on the board.");
        }

        let cells: Vec<Cell> = all_cells(height, width).collect();
        let placed = cells.choose_multiple(rng, mines).copied();
        Board::with_mines(height, width, placed)
    }

    /// A board with mines at exactly the given cells.
    pub fn with_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> anyhow::Result<Self> {
        let mines: BTreeSet<Cell> = mines.into_iter().collect();
        if let Some(cell) = mines.iter().find(|cell| !cell.in_bounds(height, width)) {
            anyhow::bail!("mine {cell} lies outside the {height}x{width} board");
        }

        Ok(Board {
            height,
            width,
            mines,
            flagged: BTreeSet::new(),
        })
    }

    /// Deserializes a board from bytes.
    pub fn deserialize(bts: &[u8]) -> anyhow::Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    /// Serializes the board to bytes.
    pub fn serialize(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn flagged(&self) -> &BTreeSet<Cell> {
        &self.flagged
    }

    pub fn flag(&mut self, cell: Cell) -> bool {
        self.flagged.insert(cell)
    }

    /// All mines have been flagged, and nothing else.
    pub fn won(&self) -> bool {
        self.flagged == self.mines
    }
}

impl Oracle for Board {
    fn height(&self) -> usize {
        self.height
    }

    fn width(&self) -> usize {
        self.width
    }

    fn neighbor_mine_count(&self, cell: Cell) -> usize {
        cell.neighbors(self.height, self.width)
            .filter(|neighbor| self.mines.contains(neighbor))
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("{}-", "--".repeat(self.width));
        for row in 0..self.height {
            writeln!(f, "{rule}")?;
            for col in 0..self.width {
                let mark = if self.is_mine(Cell::new(row, col)) { 'X' } else { ' ' };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_placement() {
        let mut rng = StdRng::seed_from_u64(42);
        let board = Board::new(8, 8, 10, &mut rng).unwrap();

        assert_eq!(board.mines().len(), 10);
        assert!(board.mines().iter().all(|&cell| board.in_bounds(cell)));
        assert!(!board.won());
    }

    #[test]
    fn test_too_many_mines() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = Board::new(3, 3, 9, &mut rng).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Total mines must be less than the number of cells on the board."
        );

        assert!(Board::with_mines(2, 2, [Cell::new(2, 0)]).is_err());
    }

    #[test]
    fn test_oversized_board() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = Board::new(usize::MAX, 2, 1, &mut rng).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("A {}x2 board has too many cells.", usize::MAX)
        );
    }

    #[test]
    fn test_neighbor_mine_count() {
        let board = Board::with_mines(3, 3, [Cell::new(0, 0), Cell::new(2, 2)]).unwrap();

        assert_eq!(board.neighbor_mine_count(Cell::new(1, 1)), 2);
        assert_eq!(board.neighbor_mine_count(Cell::new(0, 1)), 1);
        assert_eq!(board.neighbor_mine_count(Cell::new(2, 0)), 0);
        // A mine does not count itself.
        assert_eq!(board.neighbor_mine_count(Cell::new(0, 0)), 0);
    }

    #[test]
    fn test_won_requires_exact_flags() {
        let mut board = Board::with_mines(2, 2, [Cell::new(1, 1)]).unwrap();
        assert!(!board.won());

        board.flag(Cell::new(1, 1));
        assert!(board.won());

        board.flag(Cell::new(0, 0));
        assert!(!board.won());
    }

    #[test]
    fn test_display() {
        let board = Board::with_mines(1, 2, [Cell::new(0, 1)]).unwrap();
        assert_eq!(board.to_string(), "-----\n| |X|\n-----\n");
    }
}
