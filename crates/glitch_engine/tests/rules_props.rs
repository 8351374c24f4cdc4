//! Property tests for move application and evaluation.

use glitch_engine::rules::{evaluate, place_mark};
use glitch_engine::{Board, Evaluation, Player, Position, Square, WINNING_COMBINATIONS};
use proptest::prelude::*;

fn square() -> impl Strategy<Value = Square> {
    prop_oneof![
        Just(Square::Empty),
        Just(Square::Occupied(Player::X)),
        Just(Square::Occupied(Player::O)),
    ]
}

fn board() -> impl Strategy<Value = Board> {
    proptest::array::uniform9(square()).prop_map(Board::from)
}

fn uniform_line(board: &Board) -> Option<Player> {
    WINNING_COMBINATIONS.iter().find_map(|&[a, b, c]| {
        let sq = board.get(a);
        (sq != Square::Empty && sq == board.get(b) && sq == board.get(c))
            .then(|| sq.player())
            .flatten()
    })
}

proptest! {
    #[test]
    fn prop_move_changes_at_most_one_cell(
        moves in proptest::collection::vec(0usize..9, 0..30),
    ) {
        let mut board = Board::new();
        let mut player = Player::X;
        for idx in moves {
            let pos = Position::from_index(idx).unwrap();
            let before = board.clone();
            let placed = place_mark(&mut board, pos, player).is_ok();

            let changed: Vec<Position> = Position::ALL
                .into_iter()
                .filter(|p| before.get(*p) != board.get(*p))
                .collect();

            if placed {
                prop_assert_eq!(changed, vec![pos]);
                prop_assert_eq!(before.get(pos), Square::Empty);
                player = player.opponent();
            } else {
                prop_assert!(changed.is_empty());
                prop_assert_ne!(before.get(pos), Square::Empty);
            }
        }
    }

    #[test]
    fn prop_evaluation_matches_definition(board in board(), mover in prop_oneof![Just(Player::X), Just(Player::O)]) {
        let full = board.squares().iter().all(|s| *s != Square::Empty);
        match evaluate(&board, mover) {
            Evaluation::Won { winner, line } => {
                prop_assert_eq!(Some(winner), uniform_line(&board));
                prop_assert!(line.iter().all(|p| board.get(*p) == Square::Occupied(winner)));
            }
            Evaluation::Draw => {
                prop_assert!(full);
                prop_assert_eq!(uniform_line(&board), None);
            }
            Evaluation::Continue { next } => {
                prop_assert!(!full);
                prop_assert_eq!(uniform_line(&board), None);
                prop_assert_eq!(next, mover.opponent());
            }
        }
    }
}
