use crate::cell::Cell;
use thiserror::Error;

/// Protocol violations reported by the knowledge base.
///
/// None of these arise from a well-behaved game loop and an honest board;
/// each one points at a bug in the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("cell {cell} lies outside the {height}x{width} grid")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },
    #[error("cell {0} is a known mine and cannot be probed")]
    ProbedMine(Cell),
    #[error("cell {cell} reported {count} adjacent mines, which its neighbors cannot hold")]
    InconsistentCount { cell: Cell, count: usize },
    #[error("knowledge is contradictory at cell {0}")]
    Contradiction(Cell),
    #[error("sentences {superset} and {subset} imply an impossible mine count")]
    ImpossibleInference { superset: String, subset: String },
    #[error("inference did not settle within {0} passes")]
    PassLimit(usize),
}
