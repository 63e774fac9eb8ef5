#![allow(missing_docs)]

//! Question selection and the turn state machine.

pub mod controller;
pub mod frontend;
pub mod selector;
pub mod state;

pub use controller::{TurnController, DEFAULT_FEEDBACK_DELAY};
pub use frontend::{Frontend, RenderSink, ResultSink, Scheduler, Timer, TimerKind};
pub use selector::{QuestionSelector, Selection, UsedSet};
pub use state::{EndReason, Outcome, Phase, SessionState, TurnResolution};
