//! Headless session runs through the public API.

use clap::Parser;
use glitch_tictactoe::{Cli, GameConfig, simulate};

fn config(args: &[&str]) -> GameConfig {
    let cli = Cli::parse_from(std::iter::once("glitch_tictactoe").chain(args.iter().copied()));
    GameConfig::default().with_overrides(&cli).unwrap()
}

#[test]
fn test_random_human_wins_sometimes() {
    let report = simulate(&config(&["--seed", "3"]), 200);
    assert!(*report.human_wins() > 0);
    assert!(*report.bot_wins() > 0);
    assert_eq!(report.final_level().get(), *report.human_wins());
}

#[test]
fn test_high_disturbance_sessions_glitch_and_corrupt() {
    let report = simulate(&config(&["--seed", "5", "--starting-disturbance", "8"]), 100);
    assert!(*report.glitches() > 0);
    assert!(*report.corrupted_marks() > 0);
}

#[test]
fn test_report_prints_summary() {
    let report = simulate(&config(&["--seed", "11"]), 10);
    let text = report.to_string();
    assert!(text.starts_with("games: 10\n"));
    assert!(text.contains("final disturbance: "));
}
