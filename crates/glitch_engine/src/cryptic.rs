//! Cryptic messages that float over the board once the player keeps winning.

use super::GameRng;
use serde::{Deserialize, Serialize};

/// The fixed phrase list.
pub const CRYPTIC_PHRASES: [&str; 10] = [
    "Why do you keep winning?",
    "This isn't right.",
    "You shouldn't be able to do that.",
    "It's breaking...",
    "STOP.",
    "The system is failing.",
    "ERROR: REALITY MISMATCH",
    "CAN YOU HEAR IT?",
    "IT'S WATCHING.",
    "YOUR MOVES ARE NOT YOUR OWN.",
];

/// Identifier of a message on screen, unique per session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("msg#{}", _0)]
pub struct MessageId(pub u64);

/// One floating message and where to draw it.
///
/// Placement is relative so any front end can map it onto its own surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrypticMessage {
    /// Session-unique id, used to expire it.
    pub id: MessageId,
    /// The phrase.
    pub text: &'static str,
    /// Distance from the top, percent of height, in `[20, 80)`.
    pub top_pct: f64,
    /// Distance from the left, percent of width, in `[10, 90)`.
    pub left_pct: f64,
    /// Size multiplier in `[1.0, 2.5)`.
    pub scale: f64,
    /// Red channel in `[0, 255)`.
    pub red: u8,
    /// Opacity in `[0.5, 1.0)`.
    pub alpha: f64,
}

impl CrypticMessage {
    /// Rolls a phrase and a placement.
    pub fn roll(id: MessageId, rng: &mut GameRng) -> Self {
        let text = CRYPTIC_PHRASES[rng.pick_index(CRYPTIC_PHRASES.len())];
        Self {
            id,
            text,
            top_pct: rng.spread(20.0, 60.0),
            left_pct: rng.spread(10.0, 80.0),
            scale: rng.spread(1.0, 1.5),
            red: rng.spread(0.0, 255.0) as u8,
            alpha: rng.spread(0.5, 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_stays_in_bounds() {
        let mut rng = GameRng::new(11);
        for n in 0..200 {
            let msg = CrypticMessage::roll(MessageId(n), &mut rng);
            assert!(CRYPTIC_PHRASES.contains(&msg.text));
            assert!((20.0..80.0).contains(&msg.top_pct));
            assert!((10.0..90.0).contains(&msg.left_pct));
            assert!((1.0..2.5).contains(&msg.scale));
            assert!((0.5..1.0).contains(&msg.alpha));
        }
    }

    #[test]
    fn test_roll_is_reproducible() {
        let a = CrypticMessage::roll(MessageId(0), &mut GameRng::new(5));
        let b = CrypticMessage::roll(MessageId(0), &mut GameRng::new(5));
        assert_eq!(a, b);
    }
}
