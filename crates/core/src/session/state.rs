use serde::{Deserialize, Serialize};

use crate::models::{GameRules, PoolKind, Question};

use super::selector::UsedSet;

/// Where the turn state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No session has been started yet.
    Idle,
    /// Waiting for the next question to be selected.
    AwaitingQuestion,
    /// A question is on screen and the countdown is running.
    QuestionShown,
    /// The turn has been decided; waiting for the feedback delay.
    TurnResolved(TurnResolution),
    /// Terminal; the outcome has been reported.
    SessionEnded(EndReason),
}

/// How a turn was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnResolution {
    /// The countdown reached zero before an answer arrived.
    TimedOut,
    /// The player picked a choice.
    Answered {
        /// One-based choice the player picked.
        choice: u8,
        /// Whether it matched the correct choice.
        correct: bool,
    },
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Lives dropped to zero.
    OutOfLives,
    /// `questionCount` turns were played.
    QuestionBudgetReached,
    /// Both pools ran dry before the budget was reached.
    PoolsExhausted,
}

impl EndReason {
    pub fn describe(self) -> &'static str {
        match self {
            EndReason::OutOfLives => "Out of lives",
            EndReason::QuestionBudgetReached => "All questions answered",
            EndReason::PoolsExhausted => "No questions left",
        }
    }
}

/// Final snapshot handed to the result sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub score: i64,
    pub lives_remaining: u32,
    pub correct_count: u32,
    pub questions_served: u32,
    pub reason: EndReason,
}

/// Mutable state of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_index: u32,
    pub lives_remaining: u32,
    pub score: i64,
    pub correct_count: u32,
    pub used: UsedSet,
    pub current_question: Option<Question>,
    pub current_pool: Option<PoolKind>,
    pub seconds_remaining: u32,
}

impl SessionState {
    /// Fresh state at the start of a session.
    pub fn new(rules: &GameRules) -> Self {
        Self {
            current_index: 0,
            lives_remaining: rules.lives,
            score: 0,
            correct_count: 0,
            used: UsedSet::new(),
            current_question: None,
            current_pool: None,
            seconds_remaining: rules.time_limit,
        }
    }

    /// Number of questions shown so far.
    pub fn questions_served(&self) -> u32 {
        u32::try_from(self.used.len()).unwrap_or(u32::MAX)
    }

    pub fn outcome(&self, reason: EndReason) -> Outcome {
        Outcome {
            score: self.score,
            lives_remaining: self.lives_remaining,
            correct_count: self.correct_count,
            questions_served: self.questions_served(),
            reason,
        }
    }
}
