//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Number of answer choices every question carries.
pub const CHOICES_PER_QUESTION: usize = 4;

/// Which of the two question pools a question was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// The common pool.
    Regular,
    /// The pool preferred with `rareQuestionChance` probability.
    Rare,
}

impl PoolKind {
    /// Returns the opposite pool.
    pub fn other(self) -> Self {
        match self {
            PoolKind::Regular => PoolKind::Rare,
            PoolKind::Rare => PoolKind::Regular,
        }
    }

    /// Lowercase label used in logs and error messages.
    pub fn label(self) -> &'static str {
        match self {
            PoolKind::Regular => "regular",
            PoolKind::Rare => "rare",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Text shown to the player.
    pub prompt: String,
    /// The four choices, in display order.
    pub answer_choices: [String; CHOICES_PER_QUESTION],
    /// One-based index of the correct choice.
    pub correct_choice_index: u8,
}

impl Question {
    /// Build a question, rejecting a correct index outside `1..=4`.
    pub fn new(
        prompt: impl Into<String>,
        answer_choices: [String; CHOICES_PER_QUESTION],
        correct_choice_index: u8,
    ) -> Option<Self> {
        if !is_choice_in_range(correct_choice_index) {
            return None;
        }
        Some(Self {
            prompt: prompt.into(),
            answer_choices,
            correct_choice_index,
        })
    }

    /// Whether the one-based `choice` is the correct answer.
    pub fn is_correct(&self, choice: u8) -> bool {
        choice == self.correct_choice_index
    }

    /// Text of the one-based `choice`, if it exists.
    pub fn choice(&self, choice: u8) -> Option<&str> {
        if !is_choice_in_range(choice) {
            return None;
        }
        self.answer_choices
            .get(usize::from(choice) - 1)
            .map(String::as_str)
    }
}

/// Whether a one-based choice index addresses one of the four answers.
pub fn is_choice_in_range(choice: u8) -> bool {
    (1..=CHOICES_PER_QUESTION as u8).contains(&choice)
}

/// Rules read once at startup and fixed for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRules {
    /// Lives at session start.
    pub lives: u32,
    /// Maximum number of turns in a session.
    pub question_count: u32,
    /// Probability of preferring the rare pool for a turn.
    pub rare_question_chance: f64,
    /// Seconds allowed per question.
    pub time_limit: u32,
    /// Points for a correct regular answer.
    pub regular_score: i64,
    /// Points for a correct rare answer.
    pub rare_score: i64,
}

impl GameRules {
    /// Check the numeric bounds of every rule.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.lives == 0 {
            return Err(ConfigurationError::ZeroLives);
        }
        if self.question_count == 0 {
            return Err(ConfigurationError::ZeroQuestionCount);
        }
        if self.time_limit == 0 {
            return Err(ConfigurationError::ZeroTimeLimit);
        }
        // NaN fails the range check as well.
        if !(0.0..=1.0).contains(&self.rare_question_chance) {
            return Err(ConfigurationError::RareChanceOutOfRange(
                self.rare_question_chance,
            ));
        }
        Ok(())
    }

    /// Points awarded for a correct answer drawn from `kind`.
    pub fn score_for(&self, kind: PoolKind) -> i64 {
        match kind {
            PoolKind::Regular => self.regular_score,
            PoolKind::Rare => self.rare_score,
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            lives: 3,
            question_count: 10,
            rare_question_chance: 0.1,
            time_limit: 15,
            regular_score: 1,
            rare_score: 3,
        }
    }
}

/// Both question pools, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    regular: Vec<Question>,
    rare: Vec<Question>,
}

impl QuestionBank {
    /// Wrap already-validated pools.
    pub fn new(regular: Vec<Question>, rare: Vec<Question>) -> Self {
        Self { regular, rare }
    }

    /// Questions of the given pool.
    pub fn pool(&self, kind: PoolKind) -> &[Question] {
        match kind {
            PoolKind::Regular => &self.regular,
            PoolKind::Rare => &self.rare,
        }
    }

    /// Total number of questions across both pools.
    pub fn len(&self) -> usize {
        self.regular.len() + self.rare.len()
    }

    /// True when neither pool holds a question.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Formats a second count as a `MM:SS` clock.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> [String; CHOICES_PER_QUESTION] {
        ["a", "b", "c", "d"].map(String::from)
    }

    #[test]
    fn question_rejects_out_of_range_correct_index() {
        assert!(Question::new("q", choices(), 0).is_none());
        assert!(Question::new("q", choices(), 5).is_none());
        let question = Question::new("q", choices(), 4).expect("valid question");
        assert!(question.is_correct(4));
        assert!(!question.is_correct(1));
        assert_eq!(question.choice(2), Some("b"));
        assert_eq!(question.choice(0), None);
        assert_eq!(question.choice(5), None);
    }

    #[test]
    fn rules_validation_reports_first_violation() {
        let mut rules = GameRules::default();
        assert_eq!(rules.validate(), Ok(()));

        rules.lives = 0;
        assert_eq!(rules.validate(), Err(ConfigurationError::ZeroLives));

        rules = GameRules {
            question_count: 0,
            ..GameRules::default()
        };
        assert_eq!(rules.validate(), Err(ConfigurationError::ZeroQuestionCount));

        rules = GameRules {
            time_limit: 0,
            ..GameRules::default()
        };
        assert_eq!(rules.validate(), Err(ConfigurationError::ZeroTimeLimit));

        rules = GameRules {
            rare_question_chance: 1.5,
            ..GameRules::default()
        };
        assert_eq!(
            rules.validate(),
            Err(ConfigurationError::RareChanceOutOfRange(1.5))
        );

        rules.rare_question_chance = f64::NAN;
        assert!(matches!(
            rules.validate(),
            Err(ConfigurationError::RareChanceOutOfRange(_))
        ));
    }

    #[test]
    fn boundary_rare_chances_are_accepted() {
        for chance in [0.0, 1.0] {
            let rules = GameRules {
                rare_question_chance: chance,
                ..GameRules::default()
            };
            assert!(rules.validate().is_ok());
        }
    }

    #[test]
    fn score_depends_on_pool() {
        let rules = GameRules {
            regular_score: 2,
            rare_score: 7,
            ..GameRules::default()
        };
        assert_eq!(rules.score_for(PoolKind::Regular), 2);
        assert_eq!(rules.score_for(PoolKind::Rare), 7);
    }

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(75), "01:15");
    }
}
