//! A Minesweeper agent that reasons with a knowledge base of mine-count
//! sentences.
//!
//! Every probe adds a sentence "exactly `count` of these cells are mines".
//! The [`KnowledgeBase`] then repeats two deductions until neither produces
//! anything new:
//! 1. A sentence whose count is zero makes all its cells safe; one whose count
//!    equals its size makes all its cells mines.
//! 2. If one sentence's cells are a subset of another's, the cells left over
//!    hold exactly the difference of their counts.
//!
//! The agent only ever derives certainties. When nothing is certain, the game
//! loop falls back to a guess.

pub mod board;
pub mod cell;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod sentence;

pub use board::{Board, Oracle};
pub use cell::{Cell, all_cells};
pub use error::KnowledgeError;
pub use game::{Game, Status, Turn};
pub use knowledge::{DEFAULT_PASS_LIMIT, KnowledgeBase};
pub use sentence::Sentence;
