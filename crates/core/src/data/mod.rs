//! Loading and validation of rule and question files.

/// JSON loaders for `gamerule.json` and `quiz.json`.
pub mod loader;

pub use loader::{parse_question_bank, parse_rules, LoadedQuiz, QuizLoader};
