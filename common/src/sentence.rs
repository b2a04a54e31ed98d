use crate::cell::Cell;
use crate::error::KnowledgeError;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Two sentences are equal when both their cell sets and counts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    /// Returns `None` when `count` exceeds the number of cells, since no
    /// assignment could satisfy such a sentence.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Option<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return None;
        }
        Some(Sentence { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Every cell is a mine once the count covers all of them.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every cell is safe once the count reaches zero. An empty sentence yields nothing.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 && !self.cells.is_empty() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Removes a confirmed mine, decrementing the count. A member cell in a
    /// zero-count sentence cannot be a mine, and the sentence is left as is.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool, KnowledgeError> {
        if !self.cells.contains(&cell) {
            return Ok(false);
        }
        let count = self
            .count
            .checked_sub(1)
            .ok_or(KnowledgeError::Contradiction(cell))?;
        self.cells.remove(&cell);
        self.count = count;
        Ok(true)
    }

    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    /// Drops a cell without touching the count. Only for cells whose mine has
    /// already been accounted for elsewhere.
    pub(crate) fn discard(&mut self, cell: &Cell) -> bool {
        self.cells.remove(cell)
    }

    pub fn is_subset_of(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// The sentence over the cells of `self` not covered by `subset`, whose
    /// mines are whatever `self` needs beyond what `subset` already holds.
    ///
    /// `None` if `subset` is not a subset of `self`, or the resulting count is
    /// impossible (negative, or more mines than cells).
    pub fn difference(&self, subset: &Sentence) -> Option<Sentence> {
        if !subset.is_subset_of(self) {
            return None;
        }
        let count = self.count.checked_sub(subset.count)?;
        Sentence::new(self.cells.difference(&subset.cells).copied(), count)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: usize, col: usize) -> Cell {
        Cell::new(row, col)
    }

    fn sentence(cells: &[Cell], count: usize) -> Sentence {
        Sentence::new(cells.iter().copied(), count).unwrap()
    }

    #[test]
    fn test_count_cannot_exceed_cells() {
        assert!(Sentence::new([c(0, 0)], 2).is_none());
        assert!(Sentence::new([], 0).is_some());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = sentence(&[c(0, 0), c(0, 1)], 1);
        let b = sentence(&[c(0, 1), c(0, 0)], 1);
        assert_eq!(a, b);
        assert_ne!(a, sentence(&[c(0, 0), c(0, 1)], 2));
    }

    #[test]
    fn test_known_mines() {
        let all_mines = sentence(&[c(0, 0), c(0, 1)], 2);
        assert_eq!(all_mines.known_mines().len(), 2);
        assert!(all_mines.known_safes().is_empty());

        let undetermined = sentence(&[c(0, 0), c(0, 1)], 1);
        assert!(undetermined.known_mines().is_empty());
        assert!(undetermined.known_safes().is_empty());

        // Vacuously all mines, but nothing to report.
        assert!(sentence(&[], 0).known_mines().is_empty());
    }

    #[test]
    fn test_known_safes_requires_cells() {
        let safe = sentence(&[c(1, 1), c(2, 2)], 0);
        assert_eq!(safe.known_safes(), BTreeSet::from([c(1, 1), c(2, 2)]));

        assert!(sentence(&[], 0).known_safes().is_empty());
    }

    #[test]
    fn test_mark_mine() {
        let mut s = sentence(&[c(0, 0), c(0, 1), c(0, 2)], 1);

        assert!(s.mark_mine(c(0, 1)).unwrap());
        assert_eq!(s.count(), 0);
        assert_eq!(s.len(), 2);

        // Not a member: no-op.
        assert!(!s.mark_mine(c(5, 5)).unwrap());
        assert_eq!(s.count(), 0);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_mark_mine_in_zero_count_sentence() {
        let mut s = sentence(&[c(0, 0), c(0, 1)], 0);

        assert_eq!(s.mark_mine(c(0, 0)), Err(KnowledgeError::Contradiction(c(0, 0))));
        assert_eq!(s, sentence(&[c(0, 0), c(0, 1)], 0));
    }

    #[test]
    fn test_mark_safe() {
        let mut s = sentence(&[c(0, 0), c(0, 1)], 1);

        assert!(s.mark_safe(c(0, 0)));
        assert_eq!(s.count(), 1);
        assert_eq!(s.known_mines(), BTreeSet::from([c(0, 1)]));

        assert!(!s.mark_safe(c(0, 0)));
    }

    #[test]
    fn test_difference() {
        let abc = sentence(&[c(0, 0), c(0, 1), c(0, 2)], 1);
        let ab = sentence(&[c(0, 0), c(0, 1)], 1);

        let derived = abc.difference(&ab).unwrap();
        assert_eq!(derived, sentence(&[c(0, 2)], 0));

        // Not a subset.
        assert!(ab.difference(&abc).is_none());

        // Subset needs more mines than the superset allows.
        let ab2 = sentence(&[c(0, 0), c(0, 1)], 2);
        assert!(abc.difference(&ab2).is_none());

        // More mines left over than cells to hold them.
        let abc3 = sentence(&[c(0, 0), c(0, 1), c(0, 2)], 3);
        let a0 = sentence(&[c(0, 0)], 0);
        assert!(abc3.difference(&a0).is_none());
    }

    #[test]
    fn test_display() {
        let s = sentence(&[c(1, 0), c(0, 1)], 1);
        assert_eq!(s.to_string(), "{(0, 1), (1, 0)} = 1");
    }
}
