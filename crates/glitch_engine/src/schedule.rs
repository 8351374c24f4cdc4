//! Virtual-clock task scheduler.
//!
//! Every delayed thing the engine does (the bot's move, the glitch
//! retraction, message expiry, recurring timers) goes through here. The
//! clock only moves when the owner advances it, so tests can step time
//! exactly and the terminal front end can feed it wall-clock deltas.
//!
//! Tasks belong either to the session or to one round. Starting a new
//! round cancels the old round's tasks, so a late bot move can never land
//! on a fresh board.

use super::{MessageId, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// Identifies one round (the span between two resets).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("round#{}", _0)]
pub struct RoundToken(pub u64);

impl RoundToken {
    /// The token of the following round.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Lifetime of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Dies when the round ends.
    Round(RoundToken),
    /// Lives for the whole session.
    Session,
}

/// Work the engine performs when a deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    /// The bot takes its turn.
    BotMove,
    /// Remove the phantom mark of a double-placement and keep `kept`.
    GlitchRetract {
        /// The bot's real move.
        kept: Position,
        /// The mark that flickers away.
        phantom: Position,
    },
    /// Remove a cryptic message from the screen.
    ExpireMessage(MessageId),
    /// Show another cryptic message.
    CrypticMessage,
    /// Flip the cursor visibility at random.
    CursorJitter,
    /// Drop the move flash.
    EndFlash,
}

/// Handle of a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Entry {
    scope: Scope,
    task: Task,
    every: Option<Duration>,
}

/// Deadline-ordered task queue driven by an external clock.
///
/// Entries due at the same instant run in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Duration,
    queue: BTreeMap<(Duration, u64), Entry>,
    next_seq: u64,
}

impl Scheduler {
    /// Creates an empty scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of queued entries.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deadline of the earliest entry.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(due, _)| *due)
    }

    /// True if an entry for `task` is queued.
    pub fn is_scheduled(&self, task: &Task) -> bool {
        self.queue.values().any(|e| e.task == *task)
    }

    /// Runs `task` once after `delay`.
    #[instrument(skip(self))]
    pub fn schedule_once(&mut self, delay: Duration, scope: Scope, task: Task) -> TaskId {
        self.insert(self.now + delay, scope, task, None)
    }

    /// Runs `task` every `interval` for the rest of the session.
    ///
    /// Arming the same task twice keeps the existing timer and returns
    /// `None`. A zero interval is stretched to one millisecond.
    #[instrument(skip(self))]
    pub fn schedule_every(&mut self, interval: Duration, task: Task) -> Option<TaskId> {
        let armed = self
            .queue
            .values()
            .any(|e| e.every.is_some() && e.task == task);
        if armed {
            trace!("Recurring task already armed");
            return None;
        }
        let interval = interval.max(Duration::from_millis(1));
        Some(self.insert(self.now + interval, Scope::Session, task, Some(interval)))
    }

    /// Drops every entry scoped to `round`. Returns how many were dropped.
    #[instrument(skip(self))]
    pub fn cancel_round(&mut self, round: RoundToken) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, e| e.scope != Scope::Round(round));
        let dropped = before - self.queue.len();
        if dropped > 0 {
            debug!(dropped, "Cancelled round tasks");
        }
        dropped
    }

    /// Pops the earliest entry due at or before `until`.
    ///
    /// The clock moves to that entry's deadline. Recurring entries are
    /// re-armed one interval later.
    pub fn pop_due(&mut self, until: Duration) -> Option<Task> {
        let (&(due, seq), _) = self.queue.first_key_value()?;
        if due > until {
            return None;
        }
        let entry = self.queue.remove(&(due, seq))?;
        self.now = self.now.max(due);
        if let Some(every) = entry.every {
            self.insert(due + every, entry.scope, entry.task, Some(every));
        }
        trace!(?due, task = ?entry.task, "Task due");
        Some(entry.task)
    }

    /// Moves the clock forward to `until` without running anything.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    fn insert(&mut self, due: Duration, scope: Scope, task: Task, every: Option<Duration>) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((due, seq), Entry { scope, task, every });
        TaskId(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_tasks_pop_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule_once(ms(300), Scope::Session, Task::EndFlash);
        s.schedule_once(ms(100), Scope::Session, Task::BotMove);
        assert_eq!(s.pop_due(ms(50)), None);
        assert_eq!(s.pop_due(ms(500)), Some(Task::BotMove));
        assert_eq!(s.now(), ms(100));
        assert_eq!(s.pop_due(ms(500)), Some(Task::EndFlash));
        assert_eq!(s.pop_due(ms(500)), None);
    }

    #[test]
    fn test_same_deadline_keeps_insertion_order() {
        let mut s = Scheduler::new();
        s.schedule_once(ms(10), Scope::Session, Task::CursorJitter);
        s.schedule_once(ms(10), Scope::Session, Task::CrypticMessage);
        assert_eq!(s.pop_due(ms(10)), Some(Task::CursorJitter));
        assert_eq!(s.pop_due(ms(10)), Some(Task::CrypticMessage));
    }

    #[test]
    fn test_recurring_task_rearms() {
        let mut s = Scheduler::new();
        s.schedule_every(ms(1000), Task::CursorJitter);
        let mut fired = 0;
        while s.pop_due(ms(3500)).is_some() {
            fired += 1;
        }
        assert_eq!(fired, 3);
        assert_eq!(s.next_due(), Some(ms(4000)));
    }

    #[test]
    fn test_recurring_task_armed_once() {
        let mut s = Scheduler::new();
        assert!(s.schedule_every(ms(3000), Task::CrypticMessage).is_some());
        assert!(s.schedule_every(ms(3000), Task::CrypticMessage).is_none());
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn test_cancel_round_spares_session_tasks() {
        let mut s = Scheduler::new();
        let round = RoundToken(4);
        s.schedule_once(ms(500), Scope::Round(round), Task::BotMove);
        s.schedule_once(ms(500), Scope::Round(round.next()), Task::BotMove);
        s.schedule_every(ms(3000), Task::CrypticMessage);
        assert_eq!(s.cancel_round(round), 1);
        assert_eq!(s.pending(), 2);
    }

    #[test]
    fn test_advance_never_rewinds() {
        let mut s = Scheduler::new();
        s.advance_to(ms(200));
        s.advance_to(ms(100));
        assert_eq!(s.now(), ms(200));
    }
}
