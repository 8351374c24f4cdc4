//! Terminal presenter state.
//!
//! [`App`] rebuilds what the screen shows purely from [`GameEvent`]s; it
//! never looks inside the engine. It also owns the keyboard selection and
//! the screen areas of the cells for mouse hit testing.

use crate::audio::AmbientPlayer;
use glitch_engine::{
    AmbientCue, CosmeticFlag, CrypticMessage, DisturbanceLevel, GameEvent, MessageId,
    PlaybackError, Player, Position, Presenter,
};
use ratatui::layout::Rect;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// What one cell currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellView {
    /// Mark in the cell.
    pub mark: Option<Player>,
    /// Drawn damaged.
    pub corrupted: bool,
}

/// Main application state.
pub struct App {
    cells: [CellView; 9],
    status: String,
    flags: BTreeSet<CosmeticFlag>,
    messages: BTreeMap<MessageId, CrypticMessage>,
    cursor_visible: bool,
    level: DisturbanceLevel,
    ambient: Option<AmbientCue>,
    audio_failed: bool,
    player: AmbientPlayer,
    selection: Position,
    cell_areas: [Rect; 9],
    frame: u64,
}

impl App {
    /// Creates an empty view that plays ambient audio through `player`.
    pub fn new(player: AmbientPlayer) -> Self {
        Self {
            cells: [CellView::default(); 9],
            status: String::new(),
            flags: BTreeSet::new(),
            messages: BTreeMap::new(),
            cursor_visible: true,
            level: DisturbanceLevel::default(),
            ambient: None,
            audio_failed: false,
            player,
            selection: Position::Center,
            cell_areas: [Rect::default(); 9],
            frame: 0,
        }
    }

    /// The cell at `pos`.
    pub fn cell(&self, pos: Position) -> CellView {
        self.cells[pos.to_index()]
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// True if `flag` is on.
    pub fn has(&self, flag: CosmeticFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Messages on screen.
    pub fn messages(&self) -> impl Iterator<Item = &CrypticMessage> {
        self.messages.values()
    }

    /// Whether the selection highlight is drawn.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Disturbance as last announced.
    pub fn level(&self) -> DisturbanceLevel {
        self.level
    }

    /// Ambient track the engine asked for.
    pub fn ambient(&self) -> Option<&AmbientCue> {
        self.ambient.as_ref()
    }

    /// True if the last ambient request could not be played.
    pub fn audio_failed(&self) -> bool {
        self.audio_failed
    }

    /// Cell under the keyboard selection.
    pub fn selection(&self) -> Position {
        self.selection
    }

    /// Moves the keyboard selection.
    pub fn select(&mut self, pos: Position) {
        self.selection = pos;
    }

    /// Screen areas of the cells from the last draw.
    pub fn cell_areas(&self) -> &[Rect; 9] {
        &self.cell_areas
    }

    /// Records where the cells were drawn.
    pub fn set_cell_areas(&mut self, areas: [Rect; 9]) {
        self.cell_areas = areas;
    }

    /// Frames drawn so far. Drives flicker and shake.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Counts a drawn frame.
    pub fn tick(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }
}

impl Presenter for App {
    fn on_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::MarkPlaced {
                position,
                player,
                corrupted,
            } => {
                self.cells[position.to_index()] = CellView {
                    mark: Some(player),
                    corrupted,
                };
            }
            GameEvent::MarkCleared(position) => {
                self.cells[position.to_index()] = CellView::default();
            }
            GameEvent::Status(text) => self.status = text,
            GameEvent::HumanWon { level } => self.level = level,
            GameEvent::BotWon | GameEvent::Draw => {}
            GameEvent::TierReached(level) => self.level = level,
            GameEvent::FlagRaised(flag) => {
                self.flags.insert(flag);
            }
            GameEvent::FlagsCleared(flags) => {
                for flag in flags {
                    self.flags.remove(&flag);
                }
            }
            GameEvent::CursorVisibility(visible) => self.cursor_visible = visible,
            GameEvent::MessageShown(message) => {
                self.messages.insert(message.id, message);
            }
            GameEvent::MessageExpired(id) => {
                self.messages.remove(&id);
            }
            GameEvent::Reset => {
                self.cells = [CellView::default(); 9];
            }
        }
    }

    fn play_ambient(&mut self, cue: &AmbientCue) -> Result<(), PlaybackError> {
        self.ambient = Some(*cue);
        match self.player.play(cue) {
            Ok(()) => {
                self.audio_failed = false;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Ambient track unavailable");
                self.audio_failed = true;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitch_engine::{Engine, GameRng, Timings};
    use std::time::Duration;

    fn app() -> App {
        let dir = std::env::temp_dir().join("glitch_tictactoe_no_assets");
        App::new(AmbientPlayer::new(dir))
    }

    #[test]
    fn test_view_follows_engine() {
        let mut engine = Engine::new(app(), GameRng::new(3), Timings::default());
        engine.click(4);
        engine.advance(Duration::from_secs(1));

        let board = engine.state().board().clone();
        let view = engine.presenter();
        for pos in Position::ALL {
            assert_eq!(view.cell(pos).mark, board.get(pos).player());
        }
        assert_eq!(view.status(), engine.cosmetics().status());
    }

    #[test]
    fn test_reset_clears_cells_and_tier_flags() {
        let mut engine = Engine::new(app(), GameRng::new(4), Timings::default());
        engine.restore_disturbance(DisturbanceLevel::new(3));
        assert!(engine.presenter().has(CosmeticFlag::ShakeBoard));
        assert_eq!(engine.presenter().level().get(), 3);
        assert!(engine.presenter().audio_failed());

        engine.click(0);
        engine.reset();

        let view = engine.presenter();
        assert!(Position::ALL.iter().all(|p| view.cell(*p).mark.is_none()));
        assert!(!view.has(CosmeticFlag::ShakeBoard));
        assert!(view.has(CosmeticFlag::GlitchRgb));
        assert_eq!(view.status(), "It's X's turn.");
    }

    #[test]
    fn test_messages_come_and_go() {
        let mut engine = Engine::new(app(), GameRng::new(5), Timings::default());
        engine.restore_disturbance(DisturbanceLevel::new(1));
        assert_eq!(engine.presenter().messages().count(), 1);
        engine.advance(Duration::from_secs(5));
        assert_eq!(engine.presenter().messages().count(), 0);
    }
}
