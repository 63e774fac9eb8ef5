//! Collaborators the turn controller talks to.
//!
//! The controller never renders, sleeps or navigates by itself; it calls into
//! these traits and expects timer expiries to be delivered back through
//! [`TurnController::handle_timer`](super::TurnController::handle_timer).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{PoolKind, Question};

use super::state::Outcome;

/// Receives everything the player should see.
pub trait RenderSink {
    /// A new question is on screen.
    fn show_question(&mut self, question: &Question, kind: PoolKind);
    /// The turn was decided. `selected` is `None` when the countdown ran out.
    fn show_resolution(&mut self, selected: Option<u8>, correct: u8, is_correct: bool);
    /// Lives and progress changed. `current_index` is zero-based.
    fn update_hud(&mut self, lives_remaining: u32, current_index: u32, question_count: u32);
    /// The countdown changed.
    fn update_countdown(&mut self, seconds_remaining: u32);
}

/// Receives the final outcome of a session, exactly once.
pub trait ResultSink {
    fn report_outcome(&mut self, outcome: Outcome);
}

/// What a scheduled timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// One second of the per-question countdown.
    Countdown,
    /// The feedback delay after a turn is resolved.
    Resolution,
}

/// Cancellation token for a one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timer {
    pub kind: TimerKind,
    pub id: u64,
}

/// Delivers timers back to the controller after a delay.
pub trait Scheduler {
    /// Arrange for `timer` to be handed to the controller after `delay`.
    fn schedule(&mut self, timer: Timer, delay: Duration);
    /// Drop a previously scheduled timer. Cancelling an unknown timer is a no-op.
    fn cancel(&mut self, timer: Timer);
}

/// Everything a controller needs from its host.
pub trait Frontend: RenderSink + ResultSink + Scheduler {}

impl<T: RenderSink + ResultSink + Scheduler> Frontend for T {}
