//! Presentation boundary.
//!
//! The engine never draws. It tells a [`Presenter`] what happened in game
//! terms and the presenter decides how that looks or sounds.

use super::{AmbientCue, CosmeticFlag, CrypticMessage, DisturbanceLevel, MessageId, Player, Position};
use derive_more::{Display, Error};
use tracing::instrument;

/// Semantic events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A mark appeared.
    MarkPlaced {
        /// Where.
        position: Position,
        /// Whose.
        player: Player,
        /// Draw it damaged.
        corrupted: bool,
    },
    /// A mark disappeared (glitch retraction).
    MarkCleared(Position),
    /// New status line.
    Status(String),
    /// The human won; `level` is the new disturbance level.
    HumanWon {
        /// Disturbance after the win.
        level: DisturbanceLevel,
    },
    /// The bot won.
    BotWon,
    /// Board full, nobody won.
    Draw,
    /// Effects for `level` are being applied.
    TierReached(DisturbanceLevel),
    /// A cosmetic flag turned on.
    FlagRaised(CosmeticFlag),
    /// Cosmetic flags turned off.
    FlagsCleared(Vec<CosmeticFlag>),
    /// Cursor shown (`true`) or hidden.
    CursorVisibility(bool),
    /// A cryptic message appeared.
    MessageShown(CrypticMessage),
    /// A cryptic message timed out.
    MessageExpired(MessageId),
    /// A new round started.
    Reset,
}

/// Receiver of engine output.
pub trait Presenter {
    /// Handles one event.
    fn on_event(&mut self, event: GameEvent);

    /// Starts or adjusts ambient playback.
    ///
    /// The engine logs a failure and carries on.
    fn play_ambient(&mut self, cue: &AmbientCue) -> Result<(), PlaybackError> {
        let _ = cue;
        Ok(())
    }
}

/// Recorder, handy for tests and headless runs.
impl Presenter for Vec<GameEvent> {
    fn on_event(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn on_event(&mut self, event: GameEvent) {
        (**self).on_event(event);
    }

    fn play_ambient(&mut self, cue: &AmbientCue) -> Result<(), PlaybackError> {
        (**self).play_ambient(cue)
    }
}

/// Ambient playback failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Playback error: {} at {}:{}", message, file, line)]
pub struct PlaybackError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl PlaybackError {
    /// Creates a new playback error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
