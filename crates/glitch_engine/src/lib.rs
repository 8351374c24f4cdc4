//! Tic-tac-toe against a random bot that gets stranger the more you win.
//!
//! This crate holds the logic only. A front end implements [`Presenter`],
//! builds an [`Engine`], and feeds it clicks, resets and elapsed time:
//!
//! ```
//! use glitch_engine::{Engine, GameEvent, GameRng, Timings};
//! use std::time::Duration;
//!
//! let mut engine = Engine::new(Vec::<GameEvent>::new(), GameRng::new(7), Timings::default());
//! engine.click(4);
//! engine.advance(Duration::from_secs(1));
//! assert_eq!(engine.state().board().occupied_count(), 2);
//! ```
//!
//! # Architecture
//!
//! - **Rules**: pure win/draw evaluation over a [`Board`]
//! - **Bot**: uniform random mover with a cosmetic double-placement glitch
//! - **Disturbance**: the human-win counter and the effects it unlocks
//! - **Scheduler**: virtual-clock tasks scoped to a round or the session
//! - **Engine**: the controller tying it together

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
pub mod bot;
mod cryptic;
mod disturbance;
mod engine;
mod position;
mod present;
mod rng;
pub mod rules;
mod schedule;
mod timing;
mod types;

pub use action::{Move, MoveError};
pub use bot::BotPlan;
pub use cryptic::{CRYPTIC_PHRASES, CrypticMessage, MessageId};
pub use disturbance::{
    AMBIENT_BASE_VOLUME, AMBIENT_LEVEL_STEP, AMBIENT_MAX_VOLUME, AmbientCue,
    AmbientSound, CosmeticFlag, DisturbanceLevel, next_ambient,
};
pub use engine::{Cosmetics, Engine, GLITCH_STATUS, GameState};
pub use position::Position;
pub use present::{GameEvent, PlaybackError, Presenter};
pub use rng::GameRng;
pub use rules::{Evaluation, WINNING_COMBINATIONS};
pub use schedule::{RoundToken, Scheduler, Scope, Task, TaskId};
pub use timing::Timings;
pub use types::{Board, Player, Square};
