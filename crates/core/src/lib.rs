#![warn(clippy::all, missing_docs)]

//! Core domain logic for the timed quiz.
//!
//! This crate hosts the data models, configuration handling, rule and
//! question loading, and the turn state machine used by the terminal UI
//! and any future frontends.

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod session;

pub use config::AppConfig;
pub use data::{LoadedQuiz, QuizLoader};
pub use error::{ConfigurationError, QuizError, QuizResult};
pub use models::{GameRules, PoolKind, Question, QuestionBank};
pub use session::{
    EndReason, Frontend, Outcome, Phase, QuestionSelector, RenderSink, ResultSink, Scheduler,
    Selection, SessionState, Timer, TimerKind, TurnController, UsedSet,
};
