//! Disturbance escalation.
//!
//! The disturbance level counts human wins for the whole session. Each
//! threshold unlocks cosmetic effects that stay unlocked; nothing here
//! touches the board.
//!
//! | level | unlocks |
//! |-------|---------|
//! | 1 | flicker, a cryptic message per win |
//! | 2 | colour shift, recurring messages, flash on every move |
//! | 3 | rgb split, board shake, deeper colour, static |
//! | 4 | darkest colour, cursor jitter, corrupted bot pieces, whispers |
//! | 5 | hum, bot double-placement |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Cumulative count of human wins.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct DisturbanceLevel(u32);

impl DisturbanceLevel {
    /// Level at which the board starts to flicker and messages appear.
    pub const FLICKER: u32 = 1;
    /// Level at which the colours shift and messages recur.
    pub const COLOR_SHIFT: u32 = 2;
    /// Level at which the board shakes and static plays.
    pub const SHAKE: u32 = 3;
    /// Level at which the cursor jitters and bot pieces corrupt.
    pub const CORRUPTION: u32 = 4;
    /// Level at which the bot may double-place.
    pub const CHEAT: u32 = 5;

    /// Wraps a raw level.
    pub fn new(level: u32) -> Self {
        Self(level)
    }

    /// The raw level.
    pub fn get(self) -> u32 {
        self.0
    }

    /// One more human win.
    pub fn increment(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// True once `threshold` has been reached.
    pub fn at_least(self, threshold: u32) -> bool {
        self.0 >= threshold
    }

    /// Chance that a bot mark renders corrupted. Zero below level 4.
    pub fn corruption_probability(self) -> f64 {
        if self.at_least(Self::CORRUPTION) {
            (f64::from(self.0) * 0.1).min(1.0)
        } else {
            0.0
        }
    }

    /// Chance per bot turn of a glitch double-placement. Zero below level 5.
    pub fn cheat_probability(self) -> f64 {
        if self.at_least(Self::CHEAT) { 0.3 } else { 0.0 }
    }

    /// Whether every placed mark flashes the screen.
    pub fn flashes_on_move(self) -> bool {
        self.at_least(Self::COLOR_SHIFT)
    }

    /// Flags that are unlocked at this level, in unlock order.
    pub fn flags(self) -> Vec<CosmeticFlag> {
        let mut flags = Vec::new();
        if self.at_least(Self::FLICKER) {
            flags.push(CosmeticFlag::GlitchFlicker);
        }
        if self.at_least(Self::COLOR_SHIFT) {
            flags.push(CosmeticFlag::Disturbed1);
        }
        if self.at_least(Self::SHAKE) {
            flags.extend([
                CosmeticFlag::GlitchRgb,
                CosmeticFlag::ShakeBoard,
                CosmeticFlag::Disturbed2,
            ]);
        }
        if self.at_least(Self::CORRUPTION) {
            flags.push(CosmeticFlag::Disturbed3);
        }
        flags
    }

    /// The ambient track for this level, if any.
    ///
    /// Straight mapping from the highest reached threshold; tracks are
    /// never mixed.
    pub fn ambient(self) -> Option<AmbientSound> {
        match self.0 {
            0..=2 => None,
            3 => Some(AmbientSound::Static),
            4 => Some(AmbientSound::Whispers),
            _ => Some(AmbientSound::Hum),
        }
    }
}

/// Whole-screen cosmetic flags keyed by disturbance tier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum CosmeticFlag {
    /// Board and cells flicker.
    GlitchFlicker,
    /// First colour shift towards red.
    Disturbed1,
    /// Deeper colour shift.
    Disturbed2,
    /// Darkest colour shift.
    Disturbed3,
    /// Marks drawn with a split-colour fringe.
    GlitchRgb,
    /// Board shakes.
    ShakeBoard,
    /// Brief full-screen flash after a move.
    FlashGlitch,
}

impl CosmeticFlag {
    /// Flags that a reset removes. Everything else persists across rounds.
    pub const CLEARED_ON_RESET: [CosmeticFlag; 4] = [
        CosmeticFlag::Disturbed1,
        CosmeticFlag::Disturbed2,
        CosmeticFlag::Disturbed3,
        CosmeticFlag::ShakeBoard,
    ];
}

/// One of the three ambient tracks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum AmbientSound {
    /// Static noise.
    Static,
    /// Whispers.
    Whispers,
    /// Low hum.
    Hum,
}

impl AmbientSound {
    /// Asset path relative to the asset root.
    pub fn asset(self) -> &'static str {
        match self {
            AmbientSound::Static => "audio/static.mp3",
            AmbientSound::Whispers => "audio/whispers.mp3",
            AmbientSound::Hum => "audio/hum.mp3",
        }
    }

    /// Asset path under `root`.
    pub fn resolve(self, root: &Path) -> PathBuf {
        root.join(self.asset())
    }
}

/// Volume of a freshly selected track.
pub const AMBIENT_BASE_VOLUME: f32 = 0.3;
/// Volume added per disturbance level when a track is selected.
pub const AMBIENT_LEVEL_STEP: f32 = 0.05;
/// Volume ceiling.
pub const AMBIENT_MAX_VOLUME: f32 = 1.0;

/// What the ambient channel should be doing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientCue {
    /// Track to play.
    pub sound: AmbientSound,
    /// Playback volume in `[0, 1]`.
    pub volume: f32,
    /// True when the track changed, false for a volume bump only.
    pub switched: bool,
}

/// Next ambient state after a human win at `level`.
///
/// Returns `None` below level 3. The volume always follows the level; the
/// track only restarts when it changes.
pub fn next_ambient(current: Option<AmbientCue>, level: DisturbanceLevel) -> Option<AmbientCue> {
    let sound = level.ambient()?;
    Some(AmbientCue {
        sound,
        volume: (AMBIENT_BASE_VOLUME + level.get() as f32 * AMBIENT_LEVEL_STEP)
            .min(AMBIENT_MAX_VOLUME),
        switched: current.is_none_or(|playing| playing.sound != sound),
    })
}
