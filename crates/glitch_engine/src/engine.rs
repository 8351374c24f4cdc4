//! The game controller.
//!
//! [`Engine`] owns the whole session: the round being played, the
//! disturbance counter, the scheduled work, the random source and the
//! cosmetic state that the presenter mirrors. Front ends feed it clicks,
//! resets and elapsed time; everything else happens inside.

use super::bot::{self, BotPlan};
use super::rules::{self, Evaluation};
use super::{
    AmbientCue, Board, CosmeticFlag, CrypticMessage, DisturbanceLevel, GameEvent, GameRng,
    MessageId, Move, MoveError, Player, Position, Presenter, RoundToken, Scheduler, Scope, Square,
    Task, Timings, next_ambient,
};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Status shown while the bot's double-placement is on screen.
pub const GLITCH_STATUS: &str = "Processing... (a glitch)";

/// Logical state of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_player: Player,
    active: bool,
    disturbance: DisturbanceLevel,
    round: RoundToken,
    history: Vec<Move>,
}

impl GameState {
    /// Fresh session: empty board, X to move, level 0.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            active: true,
            disturbance: DisturbanceLevel::default(),
            round: RoundToken(0),
            history: Vec::new(),
        }
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whose turn it is.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// False once the round is won or drawn.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Human wins so far this session.
    pub fn disturbance(&self) -> DisturbanceLevel {
        self.disturbance
    }

    /// Token of the current round.
    pub fn round(&self) -> RoundToken {
        self.round
    }

    /// Marks that stand on the board this round, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the presenter shows that is not game logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cosmetics {
    status: String,
    flags: BTreeSet<CosmeticFlag>,
    corrupted: BTreeSet<Position>,
    ambient: Option<AmbientCue>,
    cursor_visible: bool,
    messages: BTreeMap<MessageId, CrypticMessage>,
}

impl Cosmetics {
    /// Current status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Active whole-screen flags.
    pub fn flags(&self) -> &BTreeSet<CosmeticFlag> {
        &self.flags
    }

    /// True if `flag` is active.
    pub fn has(&self, flag: CosmeticFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Cells drawn corrupted.
    pub fn corrupted(&self) -> &BTreeSet<Position> {
        &self.corrupted
    }

    /// Ambient track and volume, once one has been selected.
    pub fn ambient(&self) -> Option<&AmbientCue> {
        self.ambient.as_ref()
    }

    /// Cursor visibility as driven by the jitter timer.
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Messages currently on screen.
    pub fn messages(&self) -> impl Iterator<Item = &CrypticMessage> {
        self.messages.values()
    }
}

/// Single controller for one play session.
pub struct Engine<P: Presenter> {
    state: GameState,
    cosmetics: Cosmetics,
    scheduler: Scheduler,
    rng: GameRng,
    timings: Timings,
    presenter: P,
    next_message: u64,
}

impl<P: Presenter> Engine<P> {
    /// Starts a session and announces the first turn.
    #[instrument(skip_all, fields(seed = rng.seed()))]
    pub fn new(presenter: P, rng: GameRng, timings: Timings) -> Self {
        let mut engine = Self {
            state: GameState::new(),
            cosmetics: Cosmetics {
                cursor_visible: true,
                ..Cosmetics::default()
            },
            scheduler: Scheduler::new(),
            rng,
            timings,
            presenter,
            next_message: 0,
        };
        engine.announce_turn();
        engine
    }

    /// Logical state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Cosmetic state.
    pub fn cosmetics(&self) -> &Cosmetics {
        &self.cosmetics
    }

    /// Timing knobs in use.
    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The presenter, mutably.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Virtual time since the session started.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// The task queue.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// True while the bot owes a move (thinking or mid-glitch).
    pub fn bot_pending(&self) -> bool {
        self.state.active && self.state.current_player == Player::BOT
    }

    /// Jumps the counter to `level` and applies its effects, as if the
    /// player had just won their way there.
    ///
    /// Lowering the level is refused: the counter only grows.
    #[instrument(skip(self))]
    pub fn restore_disturbance(&mut self, level: DisturbanceLevel) {
        if level <= self.state.disturbance {
            debug!(current = %self.state.disturbance, "Ignoring non-increasing level");
            return;
        }
        self.state.disturbance = level;
        self.apply_disturbance_effects();
    }

    /// Human clicks a cell. Illegal clicks are dropped without a trace on
    /// screen.
    pub fn click(&mut self, index: usize) -> Option<Evaluation> {
        match self.try_click(index) {
            Ok(evaluation) => Some(evaluation),
            Err(e) => {
                debug!(index, error = %e, "Click ignored");
                None
            }
        }
    }

    /// Human clicks a cell, reporting why the click was refused.
    #[instrument(skip(self))]
    pub fn try_click(&mut self, index: usize) -> Result<Evaluation, MoveError> {
        let pos = Position::from_index(index).ok_or(MoveError::OutOfBounds(index))?;
        if !self.state.active {
            return Err(MoveError::GameOver);
        }
        if self.state.current_player != Player::HUMAN {
            return Err(MoveError::WrongPlayer(Player::HUMAN));
        }
        rules::place_mark(&mut self.state.board, pos, Player::HUMAN)?;
        self.state.history.push(Move::new(Player::HUMAN, pos));
        self.emit(GameEvent::MarkPlaced {
            position: pos,
            player: Player::HUMAN,
            corrupted: false,
        });
        self.flash();

        let evaluation = self.resolve_turn(Player::HUMAN);
        if self.state.active {
            let delay = self.timings.bot_delay(self.state.disturbance);
            debug!(?delay, "Scheduling bot move");
            self.scheduler
                .schedule_once(delay, Scope::Round(self.state.round), Task::BotMove);
        }
        Ok(evaluation)
    }

    /// Starts a new round. The disturbance level, ambient audio and the
    /// session timers carry over; the round's pending tasks are dropped.
    #[instrument(skip(self), fields(round = %self.state.round))]
    pub fn reset(&mut self) {
        self.scheduler.cancel_round(self.state.round);
        self.state.round = self.state.round.next();
        self.state.board = Board::new();
        self.state.current_player = Player::X;
        self.state.active = true;
        self.state.history.clear();
        self.cosmetics.corrupted.clear();

        let cleared: Vec<CosmeticFlag> = CosmeticFlag::CLEARED_ON_RESET
            .into_iter()
            .filter(|flag| self.cosmetics.flags.remove(flag))
            .collect();
        if !cleared.is_empty() {
            self.emit(GameEvent::FlagsCleared(cleared));
        }

        self.emit(GameEvent::Reset);
        self.announce_turn();
        info!(round = %self.state.round, "New round");
    }

    /// Moves the clock by `elapsed`, running everything that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run(task);
        }
        self.scheduler.advance_to(until);
    }

    /// Runs every queued task that belongs to the current round, however
    /// far in the future. Session timers are left alone.
    pub fn settle(&mut self) {
        while self.bot_pending() {
            let Some(due) = self.scheduler.next_due() else {
                break;
            };
            self.advance(due.saturating_sub(self.scheduler.now()));
        }
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::BotMove => self.bot_turn(),
            Task::GlitchRetract { kept, phantom } => self.retract(kept, phantom),
            Task::ExpireMessage(id) => {
                if self.cosmetics.messages.remove(&id).is_some() {
                    self.emit(GameEvent::MessageExpired(id));
                }
            }
            Task::CrypticMessage => self.show_message(),
            Task::CursorJitter => {
                let visible = !self.rng.chance(0.5);
                self.set_cursor(visible);
            }
            Task::EndFlash => {
                if self.cosmetics.flags.remove(&CosmeticFlag::FlashGlitch) {
                    self.emit(GameEvent::FlagsCleared(vec![CosmeticFlag::FlashGlitch]));
                }
            }
        }
    }

    #[instrument(skip(self), fields(level = %self.state.disturbance))]
    fn bot_turn(&mut self) {
        if !self.bot_pending() {
            debug!("Bot has nothing to do");
            return;
        }
        let Some(plan) = bot::plan_move(&self.state.board, self.state.disturbance, &mut self.rng)
        else {
            return;
        };

        match plan {
            BotPlan::Single(pos) => {
                self.place_bot_mark(pos);
                self.resolve_turn(Player::BOT);
            }
            BotPlan::Glitch { kept, phantom } => {
                self.place_bot_mark(kept);
                if phantom != kept {
                    self.place_bot_mark(phantom);
                }
                self.set_status(GLITCH_STATUS.to_string());
                let delay = self.timings.retract_delay(self.state.disturbance);
                self.scheduler.schedule_once(
                    delay,
                    Scope::Round(self.state.round),
                    Task::GlitchRetract { kept, phantom },
                );
            }
        }
    }

    #[instrument(skip(self))]
    fn retract(&mut self, kept: Position, phantom: Position) {
        self.state.board.clear(phantom);
        self.cosmetics.corrupted.remove(&phantom);
        self.emit(GameEvent::MarkCleared(phantom));
        if phantom != kept {
            self.state.history.retain(|mv| mv.position != phantom);
        }

        self.state.board.set(kept, Square::Occupied(Player::BOT));
        let corrupted = self.cosmetics.corrupted.contains(&kept);
        self.emit(GameEvent::MarkPlaced {
            position: kept,
            player: Player::BOT,
            corrupted,
        });

        self.resolve_turn(Player::BOT);
    }

    fn place_bot_mark(&mut self, pos: Position) {
        if let Err(e) = rules::place_mark(&mut self.state.board, pos, Player::BOT) {
            warn!(error = %e, "Bot picked an occupied square");
            return;
        }
        let mv = Move::new(Player::BOT, pos);
        debug!(%mv, "Bot mark");
        self.state.history.push(mv);
        let odds = self.state.disturbance.corruption_probability();
        let corrupted = odds > 0.0 && self.rng.chance(odds);
        if corrupted {
            self.cosmetics.corrupted.insert(pos);
        }
        self.emit(GameEvent::MarkPlaced {
            position: pos,
            player: Player::BOT,
            corrupted,
        });
        self.flash();
    }

    /// Evaluates the board after `mover` played and applies the verdict.
    fn resolve_turn(&mut self, mover: Player) -> Evaluation {
        let evaluation = rules::evaluate(&self.state.board, mover);
        if !matches!(evaluation, Evaluation::Continue { .. }) {
            debug!(board = %self.state.board.display(), "Round over");
        }
        match evaluation {
            Evaluation::Won { winner, .. } => {
                self.state.active = false;
                if winner.is_human() {
                    self.state.disturbance.increment();
                    info!(level = %self.state.disturbance, "Human wins");
                    self.set_status(format!("{winner} Wins! The system screams."));
                    self.emit(GameEvent::HumanWon {
                        level: self.state.disturbance,
                    });
                    self.apply_disturbance_effects();
                } else {
                    info!("Bot wins");
                    self.set_status(format!("{winner} Wins! The silence grows."));
                    self.emit(GameEvent::BotWon);
                }
            }
            Evaluation::Draw => {
                self.state.active = false;
                info!("Draw");
                self.set_status("Draw!".to_string());
                self.emit(GameEvent::Draw);
            }
            Evaluation::Continue { next } => {
                self.state.current_player = next;
                self.announce_turn();
            }
        }
        evaluation
    }

    #[instrument(skip(self), fields(level = %self.state.disturbance))]
    fn apply_disturbance_effects(&mut self) {
        let level = self.state.disturbance;
        info!("Disturbance Level: {}", level);
        self.emit(GameEvent::TierReached(level));

        for flag in level.flags() {
            self.raise(flag);
        }

        if level.at_least(DisturbanceLevel::FLICKER) {
            self.show_message();
        }
        if level.at_least(DisturbanceLevel::COLOR_SHIFT) {
            self.scheduler
                .schedule_every(self.timings.message_interval(), Task::CrypticMessage);
        }
        if level.at_least(DisturbanceLevel::CORRUPTION) {
            self.scheduler
                .schedule_every(self.timings.cursor_interval(), Task::CursorJitter);
            self.set_cursor(false);
        }

        if let Some(cue) = next_ambient(self.cosmetics.ambient, level) {
            self.cosmetics.ambient = Some(cue);
            if let Err(e) = self.presenter.play_ambient(&cue) {
                warn!(error = %e, sound = %cue.sound, "Audio playback failed");
            }
        }
    }

    fn show_message(&mut self) {
        let id = MessageId(self.next_message);
        self.next_message += 1;
        let message = CrypticMessage::roll(id, &mut self.rng);
        debug!(%id, text = message.text, "Cryptic message");
        self.cosmetics.messages.insert(id, message.clone());
        self.emit(GameEvent::MessageShown(message));
        self.scheduler.schedule_once(
            self.timings.message_lifetime(),
            Scope::Session,
            Task::ExpireMessage(id),
        );
    }

    fn flash(&mut self) {
        if !self.state.disturbance.flashes_on_move() {
            return;
        }
        self.raise(CosmeticFlag::FlashGlitch);
        self.scheduler
            .schedule_once(self.timings.flash(), Scope::Session, Task::EndFlash);
    }

    fn raise(&mut self, flag: CosmeticFlag) {
        if self.cosmetics.flags.insert(flag) {
            self.emit(GameEvent::FlagRaised(flag));
        }
    }

    fn set_cursor(&mut self, visible: bool) {
        if self.cosmetics.cursor_visible != visible {
            self.cosmetics.cursor_visible = visible;
            self.emit(GameEvent::CursorVisibility(visible));
        }
    }

    fn announce_turn(&mut self) {
        let text = format!("It's {}'s turn.", self.state.current_player);
        self.set_status(text);
    }

    fn set_status(&mut self, text: String) {
        self.cosmetics.status.clone_from(&text);
        self.emit(GameEvent::Status(text));
    }

    fn emit(&mut self, event: GameEvent) {
        self.presenter.on_event(event);
    }
}
