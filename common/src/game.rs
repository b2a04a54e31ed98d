use crate::board::{Board, Oracle};
use crate::cell::Cell;
use crate::knowledge::KnowledgeBase;
use rand::Rng;

const LOG_GAME: &str = "game";

/// Represents the current state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

/// What happened during a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Probed a cell the agent knew to be safe.
    Safe(Cell),
    /// Nothing was known to be safe, so the agent guessed and survived.
    Guess(Cell),
    /// The probed cell was a mine.
    Exploded(Cell),
    /// No unprobed cell remains that is not a known mine.
    Stuck,
}

/// A board together with the agent playing it.
pub struct Game {
    board: Board,
    agent: KnowledgeBase,
    lost: bool,
    moves: usize,
}

impl Game {
    pub fn new(board: Board) -> Self {
        let agent = KnowledgeBase::new(board.height(), board.width());
        Game::with_agent(board, agent)
    }

    /// Plays `board` with a preconfigured agent, which must share its dimensions.
    pub fn with_agent(board: Board, agent: KnowledgeBase) -> Self {
        debug_assert_eq!(
            (board.height(), board.width()),
            (agent.height(), agent.width())
        );
        Game {
            board,
            agent,
            lost: false,
            moves: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent(&self) -> &KnowledgeBase {
        &self.agent
    }

    pub fn moves(&self) -> usize {
        self.moves
    }

    pub fn status(&self) -> Status {
        if self.lost {
            Status::Lost
        } else if self.board.won() {
            Status::Won
        } else {
            Status::Playing
        }
    }

    /// Plays one turn: a known safe cell if there is one, otherwise a guess.
    ///
    /// A surviving probe feeds its neighbor count back into the agent, and
    /// every mine the agent knows of is flagged on the board.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> anyhow::Result<Turn> {
        if self.status() != Status::Playing {
            anyhow::bail!("game_ended");
        }

        let (cell, turn) = match self.agent.safe_move() {
            Some(cell) => (cell, Turn::Safe(cell)),
            None => match self.agent.random_move(rng) {
                Some(cell) => (cell, Turn::Guess(cell)),
                None => return Ok(Turn::Stuck),
            },
        };
        self.moves += 1;

        if self.board.is_mine(cell) {
            log::info!(target: LOG_GAME, "Move {}: {cell} was a mine.", self.moves);
            self.lost = true;
            return Ok(Turn::Exploded(cell));
        }

        let count = self.board.neighbor_mine_count(cell);
        log::info!(target: LOG_GAME, "Move {}: {turn:?} revealed {count}.", self.moves);
        self.agent.add_knowledge(cell, count)?;

        for &mine in self.agent.mines() {
            self.board.flag(mine);
        }

        Ok(turn)
    }

    /// Plays until the game is decided or no move is left.
    pub fn play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> anyhow::Result<Status> {
        while self.status() == Status::Playing {
            if self.step(rng)? == Turn::Stuck {
                break;
            }
        }
        Ok(self.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_mine_free_board_is_won() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::with_mines(4, 4, []).unwrap();
        let mut game = Game::new(board);

        // No mines at all: flagged (empty) already matches.
        assert_eq!(game.status(), Status::Won);
        assert!(game.step(&mut rng).is_err());
    }

    #[test]
    fn test_single_row_is_solved() {
        // Opening at the left edge leaves no guesswork before the mine at the far end.
        let mut rng = StdRng::seed_from_u64(3);
        let board = Board::with_mines(1, 4, [Cell::new(0, 3)]).unwrap();
        let mut agent = KnowledgeBase::new(1, 4);
        agent.add_knowledge(Cell::new(0, 0), 0).unwrap();
        let mut game = Game::with_agent(board, agent);

        assert_eq!(game.step(&mut rng).unwrap(), Turn::Safe(Cell::new(0, 1)));
        assert_eq!(game.play(&mut rng).unwrap(), Status::Won);
        assert_eq!(game.board().flagged(), game.board().mines());
        assert_eq!(game.agent().moves_made().len(), 3);
        assert_eq!(game.moves(), 2);
    }

    #[test]
    fn test_safe_moves_never_explode() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let board = Board::new(8, 8, 10, &mut rng).unwrap();
            let mut game = Game::new(board);

            while game.status() == Status::Playing {
                let safe = game.agent().safe_move();
                let turn = game.step(&mut rng).unwrap();
                if let Turn::Exploded(cell) = turn {
                    assert_ne!(safe, Some(cell));
                }
                if turn == Turn::Stuck {
                    break;
                }
            }

            let agent = game.agent();
            assert!(agent.safes().is_disjoint(agent.mines()));
            assert!(agent.mines().is_subset(game.board().mines()));
        }
    }
}
