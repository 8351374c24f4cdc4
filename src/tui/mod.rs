//! Terminal UI for glitch_tictactoe.

mod app;
mod input;
mod ui;

pub use app::{App, CellView};
pub use input::{Action, hit_test, map_event, move_cursor};

use crate::audio::AmbientPlayer;
use crate::config::GameConfig;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use glitch_engine::{DisturbanceLevel, Engine};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument};

/// Runs the game in the terminal until the player quits.
#[instrument(skip_all, fields(tick_ms = config.tick_ms()))]
pub async fn run_tui(config: &GameConfig) -> Result<()> {
    info!("Starting terminal game");

    let app = App::new(AmbientPlayer::new(config.asset_dir()));
    let mut engine = Engine::new(app, config.rng(), config.timing().clone());
    engine.restore_disturbance(DisturbanceLevel::new(*config.starting_disturbance()));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_loop(&mut terminal, &mut engine, Duration::from_millis(*config.tick_ms())).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!(
        level = %engine.state().disturbance(),
        "Session over"
    );
    res
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: &mut Engine<App>,
    tick: Duration,
) -> Result<()> {
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();

    loop {
        ticker.tick().await;
        let now = Instant::now();
        engine.advance(now - last);
        last = now;

        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            let app = engine.presenter();
            let Some(action) = map_event(&ev, app.selection(), app.cell_areas()) else {
                continue;
            };
            debug!(?action, "Input");
            match action {
                Action::Quit => {
                    info!("User quit");
                    return Ok(());
                }
                Action::Reset => engine.reset(),
                Action::Select(pos) => engine.presenter_mut().select(pos),
                Action::Play(pos) => {
                    engine.presenter_mut().select(pos);
                    engine.click(pos.to_index());
                }
            }
        }

        terminal.draw(|f| ui::draw(f, engine.presenter_mut()))?;
        engine.presenter_mut().tick();
    }
}
