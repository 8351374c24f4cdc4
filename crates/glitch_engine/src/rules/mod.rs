//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. The engine owns all state; these
//! functions only inspect or mutate what they are handed.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WINNING_COMBINATIONS, check_winner, winning_line};

use super::{Board, MoveError, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Verdict after a mark lands on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// Three in a row. `line` is the first matching combination.
    Won {
        /// The player owning the line.
        winner: Player,
        /// The winning triple.
        line: [Position; 3],
    },
    /// Board full, no line.
    Draw,
    /// Play passes to `next`.
    Continue {
        /// The player to move next.
        next: Player,
    },
}

/// Evaluates the board after `mover` has played.
///
/// Combinations are checked in declared order and the first uniform one
/// wins. Without a win a full board is a draw; otherwise the turn passes.
#[instrument(skip(board))]
pub fn evaluate(board: &Board, mover: Player) -> Evaluation {
    if let Some(line) = winning_line(board)
        && let Square::Occupied(winner) = board.get(line[0])
    {
        return Evaluation::Won { winner, line };
    }

    if is_draw(board) {
        return Evaluation::Draw;
    }

    Evaluation::Continue {
        next: mover.opponent(),
    }
}

/// Marks `pos` for `player` if it is free.
///
/// The board is left untouched when the square is taken.
#[instrument(skip(board))]
pub fn place_mark(board: &mut Board, pos: Position, player: Player) -> Result<(), MoveError> {
    if !board.is_empty(pos) {
        return Err(MoveError::SquareOccupied(pos));
    }
    board.set(pos, Square::Occupied(player));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_move_passes_turn() {
        let mut board = Board::new();
        place_mark(&mut board, Position::Center, Player::X).unwrap();
        assert_eq!(
            evaluate(&board, Player::X),
            Evaluation::Continue { next: Player::O }
        );
    }

    #[test]
    fn test_top_row_wins_for_x() {
        let mut board = Board::new();
        for pos in [Position::TopLeft, Position::TopCenter, Position::TopRight] {
            board.set(pos, Square::Occupied(Player::X));
        }
        assert_eq!(
            evaluate(&board, Player::X),
            Evaluation::Won {
                winner: Player::X,
                line: [Position::TopLeft, Position::TopCenter, Position::TopRight],
            }
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        // X O X / X O O / O X X
        let x = Square::Occupied(Player::X);
        let o = Square::Occupied(Player::O);
        let board = Board::from([x, o, x, x, o, o, o, x, x]);
        assert_eq!(evaluate(&board, Player::X), Evaluation::Draw);
    }

    #[test]
    fn test_win_on_last_square_beats_draw() {
        // X O X / O X O / O X X  - diagonal on a full board
        let x = Square::Occupied(Player::X);
        let o = Square::Occupied(Player::O);
        let board = Board::from([x, o, x, o, x, o, o, x, x]);
        assert!(matches!(
            evaluate(&board, Player::X),
            Evaluation::Won {
                winner: Player::X,
                ..
            }
        ));
    }

    #[test]
    fn test_place_on_occupied_square_is_refused() {
        let mut board = Board::new();
        place_mark(&mut board, Position::Center, Player::X).unwrap();
        let before = board.clone();
        assert_eq!(
            place_mark(&mut board, Position::Center, Player::O),
            Err(MoveError::SquareOccupied(Position::Center))
        );
        assert_eq!(board, before);
    }
}
