//! Headless sessions: a random clicker against the bot.

use crate::config::GameConfig;
use derive_getters::Getters;
use derive_more::Display;
use glitch_engine::{
    DisturbanceLevel, Engine, GLITCH_STATUS, GameEvent, GameRng, Player, Presenter,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Outcome counts of a headless session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Serialize, Display)]
#[display(
    "games: {}\nhuman wins: {}\nbot wins: {}\ndraws: {}\nglitches: {}\ncorrupted marks: {}\ncryptic messages: {}\nfinal disturbance: {}",
    games, human_wins, bot_wins, draws, glitches, corrupted_marks, messages, final_level
)]
pub struct SimulationReport {
    /// Rounds played.
    games: u32,
    /// Rounds the random human won.
    human_wins: u32,
    /// Rounds the bot won.
    bot_wins: u32,
    /// Drawn rounds.
    draws: u32,
    /// Glitch double-placements.
    glitches: u32,
    /// Bot marks drawn corrupted.
    corrupted_marks: u32,
    /// Cryptic messages shown.
    messages: u32,
    /// Disturbance at the end of the run.
    final_level: DisturbanceLevel,
}

/// Presenter that only counts.
#[derive(Debug, Default)]
struct Tally {
    report: SimulationReport,
}

impl Presenter for Tally {
    fn on_event(&mut self, event: GameEvent) {
        let r = &mut self.report;
        match event {
            GameEvent::HumanWon { level } => {
                r.human_wins += 1;
                r.final_level = level;
            }
            GameEvent::BotWon => r.bot_wins += 1,
            GameEvent::Draw => r.draws += 1,
            GameEvent::Status(text) if text == GLITCH_STATUS => r.glitches += 1,
            GameEvent::MarkPlaced {
                corrupted: true, ..
            } => r.corrupted_marks += 1,
            GameEvent::MessageShown(_) => r.messages += 1,
            GameEvent::TierReached(level) => r.final_level = level,
            _ => {}
        }
    }
}

/// Plays `games` rounds with a uniformly random human.
///
/// Uses the configured timings, seed and starting disturbance; time is
/// virtual, so the run finishes as fast as the engine can go.
#[instrument(skip(config))]
pub fn simulate(config: &GameConfig, games: u32) -> SimulationReport {
    let rng = config.rng();
    let mut clicker = GameRng::new(rng.seed().wrapping_add(1));
    let mut engine = Engine::new(Tally::default(), rng, config.timing().clone());
    engine.restore_disturbance(DisturbanceLevel::new(*config.starting_disturbance()));

    for game in 0..games {
        while engine.state().is_active() {
            if engine.state().current_player() == Player::HUMAN {
                let free = engine.state().board().empty_positions();
                if let Some(pos) = clicker.choose(&free) {
                    engine.click(pos.to_index());
                }
            }
            engine.settle();
        }
        debug!(game, status = engine.cosmetics().status(), "Round finished");
        engine.reset();
    }

    let mut report = engine.presenter().report.clone();
    report.games = games;
    report.final_level = engine.state().disturbance();
    info!(
        human_wins = report.human_wins,
        bot_wins = report.bot_wins,
        draws = report.draws,
        level = %report.final_level,
        "Simulation finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn seeded(seed: u64) -> GameConfig {
        let cli = Cli {
            seed: Some(seed),
            ..Cli::default()
        };
        GameConfig::default().with_overrides(&cli).unwrap()
    }

    #[test]
    fn test_every_game_has_one_outcome() {
        let report = simulate(&seeded(1), 50);
        assert_eq!(report.games(), &50);
        assert_eq!(report.human_wins() + report.bot_wins() + report.draws(), 50);
        assert_eq!(report.final_level().get(), *report.human_wins());
    }

    #[test]
    fn test_same_seed_same_report() {
        assert_eq!(simulate(&seeded(9), 30), simulate(&seeded(9), 30));
    }

    #[test]
    fn test_starting_disturbance_counts_on_top() {
        let cli = Cli {
            seed: Some(4),
            starting_disturbance: Some(5),
            ..Cli::default()
        };
        let config = GameConfig::default().with_overrides(&cli).unwrap();
        let report = simulate(&config, 40);
        assert_eq!(report.final_level().get(), 5 + report.human_wins());
        assert!(report.messages() > &0);
    }
}
