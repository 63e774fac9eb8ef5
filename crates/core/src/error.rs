//! Typed errors surfaced by the quiz core.

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a rule set or question bank is rejected before a session starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// `lives` must be at least one.
    #[error("lives must be greater than zero")]
    ZeroLives,
    /// `questionCount` must be at least one.
    #[error("questionCount must be greater than zero")]
    ZeroQuestionCount,
    /// `timeLimit` must be at least one second.
    #[error("timeLimit must be greater than zero")]
    ZeroTimeLimit,
    /// `rareQuestionChance` must be a probability.
    #[error("rareQuestionChance must be within [0, 1], got {0}")]
    RareChanceOutOfRange(f64),
    /// Neither pool contains a question.
    #[error("both question pools are empty")]
    NoQuestions,
    /// A question does not carry exactly four answer choices.
    #[error("{pool} question #{index} has {found} answer choices, expected 4")]
    WrongChoiceCount {
        /// Pool the question belongs to.
        pool: &'static str,
        /// Zero-based position inside the pool.
        index: usize,
        /// Number of choices present.
        found: usize,
    },
    /// A question's correct index does not point at one of its four choices.
    #[error("{pool} question #{index} has correct choice {correct}, expected 1-4")]
    CorrectChoiceOutOfRange {
        /// Pool the question belongs to.
        pool: &'static str,
        /// Zero-based position inside the pool.
        index: usize,
        /// Offending value.
        correct: i64,
    },
}

/// Errors produced while loading or validating quiz data.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The data was readable but does not describe a playable quiz.
    #[error("invalid quiz configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    /// A data file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A data file is not valid JSON for the expected shape.
    #[error("failed to parse {path}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for core results.
pub type QuizResult<T> = Result<T, QuizError>;
