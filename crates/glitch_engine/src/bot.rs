//! The bot: a uniformly random mover that learns to cheat, visually.

use super::{Board, DisturbanceLevel, GameRng, Position};
use tracing::{debug, instrument};

/// What the bot intends to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotPlan {
    /// One ordinary mark.
    Single(Position),
    /// Two marks now, `phantom` retracted later. The picks are
    /// independent and may be the same cell.
    Glitch {
        /// The move that stays.
        kept: Position,
        /// The move that flickers away.
        phantom: Position,
    },
}

/// Uniform pick among the empty cells.
#[instrument(skip(board, rng))]
pub fn pick_move(board: &Board, rng: &mut GameRng) -> Option<Position> {
    let free = board.empty_positions();
    rng.choose(&free).copied()
}

/// Plans the bot's turn, or `None` on a full board.
///
/// From level 5 a 30% roll turns the move into a glitch double-placement.
#[instrument(skip(board, rng))]
pub fn plan_move(board: &Board, level: DisturbanceLevel, rng: &mut GameRng) -> Option<BotPlan> {
    let kept = pick_move(board, rng)?;

    let cheat = level.cheat_probability();
    if cheat > 0.0 && rng.chance(cheat) {
        let phantom = pick_move(board, rng)?;
        debug!(?kept, ?phantom, "Bot glitches");
        return Some(BotPlan::Glitch { kept, phantom });
    }

    Some(BotPlan::Single(kept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Square};

    #[test]
    fn test_full_board_has_no_move() {
        let x = Square::Occupied(Player::X);
        let board = Board::from([x; 9]);
        assert_eq!(pick_move(&board, &mut GameRng::new(0)), None);
        assert_eq!(
            plan_move(&board, DisturbanceLevel::new(9), &mut GameRng::new(0)),
            None
        );
    }

    #[test]
    fn test_only_free_cell_is_chosen() {
        let x = Square::Occupied(Player::X);
        let mut board = Board::from([x; 9]);
        board.clear(Position::BottomCenter);
        for seed in 0..20 {
            assert_eq!(
                pick_move(&board, &mut GameRng::new(seed)),
                Some(Position::BottomCenter)
            );
        }
    }

    #[test]
    fn test_picks_only_empty_cells() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Player::X));
        board.set(Position::TopLeft, Square::Occupied(Player::O));
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            let pos = pick_move(&board, &mut rng).unwrap();
            assert!(board.is_empty(pos));
        }
    }

    #[test]
    fn test_plan_draws_like_pick() {
        let mut board = Board::new();
        board.set(Position::Center, Square::Occupied(Player::X));
        for seed in 0..20 {
            let picked = pick_move(&board, &mut GameRng::new(seed));
            let planned = plan_move(&board, DisturbanceLevel::new(0), &mut GameRng::new(seed));
            assert_eq!(planned, picked.map(BotPlan::Single));
        }
    }

    #[test]
    fn test_no_glitch_below_level_five() {
        let board = Board::new();
        let mut rng = GameRng::new(3);
        for _ in 0..200 {
            let plan = plan_move(&board, DisturbanceLevel::new(4), &mut rng).unwrap();
            assert!(matches!(plan, BotPlan::Single(_)));
        }
    }

    #[test]
    fn test_glitch_appears_at_level_five() {
        let board = Board::new();
        let mut rng = GameRng::new(3);
        let glitches = (0..500)
            .filter_map(|_| plan_move(&board, DisturbanceLevel::new(5), &mut rng))
            .filter(|plan| matches!(plan, BotPlan::Glitch { .. }))
            .count();
        // Expected around 150.
        assert!((75..=225).contains(&glitches), "glitches = {glitches}");
    }

    #[test]
    fn test_picks_cover_every_free_cell() {
        let board = Board::new();
        let mut rng = GameRng::new(8);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(pick_move(&board, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 9);
    }
}
