//! Delays and intervals, most of them stretched by the disturbance level.

use super::DisturbanceLevel;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing knobs, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Bot thinking time at level 0.
    bot_delay_base_ms: u64,
    /// Extra bot thinking time per disturbance level.
    bot_delay_step_ms: u64,
    /// Time a glitch double-placement stays visible at level 0.
    retract_base_ms: u64,
    /// Extra glitch visibility per disturbance level.
    retract_step_ms: u64,
    /// How long a cryptic message stays on screen.
    message_lifetime_ms: u64,
    /// Interval of the recurring cryptic message timer.
    message_interval_ms: u64,
    /// Interval of the cursor jitter timer.
    cursor_interval_ms: u64,
    /// Length of the flash raised by each move.
    flash_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            bot_delay_base_ms: 500,
            bot_delay_step_ms: 50,
            retract_base_ms: 300,
            retract_step_ms: 100,
            message_lifetime_ms: 5000,
            message_interval_ms: 3000,
            cursor_interval_ms: 1000,
            flash_ms: 100,
        }
    }
}

impl Timings {
    /// Delay between the human's move and the bot's.
    pub fn bot_delay(&self, level: DisturbanceLevel) -> Duration {
        scaled(self.bot_delay_base_ms, self.bot_delay_step_ms, level)
    }

    /// Delay before a glitch double-placement is retracted.
    pub fn retract_delay(&self, level: DisturbanceLevel) -> Duration {
        scaled(self.retract_base_ms, self.retract_step_ms, level)
    }

    /// Lifetime of one cryptic message.
    pub fn message_lifetime(&self) -> Duration {
        Duration::from_millis(self.message_lifetime_ms)
    }

    /// Period of the recurring cryptic message timer.
    pub fn message_interval(&self) -> Duration {
        Duration::from_millis(self.message_interval_ms)
    }

    /// Period of the cursor jitter timer.
    pub fn cursor_interval(&self) -> Duration {
        Duration::from_millis(self.cursor_interval_ms)
    }

    /// Length of a move flash.
    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }
}

fn scaled(base: u64, step: u64, level: DisturbanceLevel) -> Duration {
    Duration::from_millis(base.saturating_add(step.saturating_mul(u64::from(level.get()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_delay_grows_with_level() {
        let t = Timings::default();
        assert_eq!(t.bot_delay(DisturbanceLevel::new(0)), Duration::from_millis(500));
        assert_eq!(t.bot_delay(DisturbanceLevel::new(4)), Duration::from_millis(700));
    }

    #[test]
    fn test_retract_delay_at_level_five() {
        let t = Timings::default();
        assert_eq!(
            t.retract_delay(DisturbanceLevel::new(5)),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let t: Timings = serde_json::from_str(r#"{"flash_ms": 250}"#).unwrap();
        assert_eq!(*t.flash_ms(), 250);
        assert_eq!(*t.bot_delay_base_ms(), 500);
    }
}
