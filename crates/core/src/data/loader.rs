use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    error::{ConfigurationError, QuizError, QuizResult},
    models::{GameRules, PoolKind, Question, QuestionBank, CHOICES_PER_QUESTION},
};

/// Validated rules and questions, ready to drive a session.
#[derive(Debug, Clone)]
pub struct LoadedQuiz {
    /// Session rules.
    pub rules: GameRules,
    /// Regular and rare pools.
    pub bank: QuestionBank,
    /// When the files were read.
    pub loaded_at: DateTime<Utc>,
}

impl LoadedQuiz {
    /// Validate an in-memory rule set and bank together.
    pub fn new(rules: GameRules, bank: QuestionBank) -> QuizResult<Self> {
        rules.validate()?;
        if bank.is_empty() {
            return Err(ConfigurationError::NoQuestions.into());
        }
        Ok(Self {
            rules,
            bank,
            loaded_at: Utc::now(),
        })
    }
}

/// Reads the rule file and the question file from disk.
#[derive(Debug, Clone)]
pub struct QuizLoader {
    rules_path: PathBuf,
    questions_path: PathBuf,
}

impl QuizLoader {
    /// Build a loader for the given rule and question files.
    pub fn new(rules_path: impl Into<PathBuf>, questions_path: impl Into<PathBuf>) -> Self {
        Self {
            rules_path: rules_path.into(),
            questions_path: questions_path.into(),
        }
    }

    /// Path of the rule file.
    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }

    /// Path of the question file.
    pub fn questions_path(&self) -> &Path {
        &self.questions_path
    }

    /// Read, parse and validate both files.
    pub async fn load(&self) -> QuizResult<LoadedQuiz> {
        let rules_raw = read_file(&self.rules_path).await?;
        let rules = parse_rules(&rules_raw).map_err(|err| with_path(err, &self.rules_path))?;

        let questions_raw = read_file(&self.questions_path).await?;
        let bank = parse_question_bank(&questions_raw)
            .map_err(|err| with_path(err, &self.questions_path))?;

        let quiz = LoadedQuiz::new(rules, bank)?;
        info!(
            regular = quiz.bank.pool(PoolKind::Regular).len(),
            rare = quiz.bank.pool(PoolKind::Rare).len(),
            question_count = quiz.rules.question_count,
            "Quiz data loaded"
        );
        Ok(quiz)
    }
}

async fn read_file(path: &Path) -> QuizResult<String> {
    debug!(path = %path.display(), "Reading quiz data file");
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| QuizError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn with_path(err: QuizError, path: &Path) -> QuizError {
    match err {
        QuizError::Parse { source, .. } => QuizError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

/// Parse and validate a rule document.
pub fn parse_rules(content: &str) -> QuizResult<GameRules> {
    let rules: GameRules = serde_json::from_str(content).map_err(|source| QuizError::Parse {
        path: PathBuf::new(),
        source,
    })?;
    rules.validate()?;
    Ok(rules)
}

/// Parse a question document into both pools, validating every entry.
pub fn parse_question_bank(content: &str) -> QuizResult<QuestionBank> {
    let raw: RawQuizData = serde_json::from_str(content).map_err(|source| QuizError::Parse {
        path: PathBuf::new(),
        source,
    })?;
    let regular = build_pool(PoolKind::Regular, raw.quiz_data)?;
    let rare = build_pool(PoolKind::Rare, raw.rare_quiz_data)?;
    Ok(QuestionBank::new(regular, rare))
}

fn build_pool(kind: PoolKind, raw: Vec<RawQuestion>) -> Result<Vec<Question>, ConfigurationError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, question)| question.into_question(kind, index))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuizData {
    #[serde(default)]
    quiz_data: Vec<RawQuestion>,
    #[serde(default, alias = "rateQuizData")]
    rare_quiz_data: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(alias = "question")]
    prompt: String,
    #[serde(alias = "answers")]
    answer_choices: Vec<String>,
    #[serde(alias = "correct")]
    correct_choice_index: i64,
}

impl RawQuestion {
    fn into_question(self, kind: PoolKind, index: usize) -> Result<Question, ConfigurationError> {
        let found = self.answer_choices.len();
        let choices: [String; CHOICES_PER_QUESTION] =
            self.answer_choices
                .try_into()
                .map_err(|_| ConfigurationError::WrongChoiceCount {
                    pool: kind.label(),
                    index,
                    found,
                })?;

        let out_of_range = ConfigurationError::CorrectChoiceOutOfRange {
            pool: kind.label(),
            index,
            correct: self.correct_choice_index,
        };
        let correct = u8::try_from(self.correct_choice_index).map_err(|_| out_of_range.clone())?;
        Question::new(self.prompt, choices, correct).ok_or(out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const RULES: &str = r#"{
        "lives": 3,
        "questionCount": 5,
        "rareQuestionChance": 0.25,
        "timeLimit": 20,
        "regularScore": 1,
        "rareScore": 5
    }"#;

    const QUESTIONS: &str = r#"{
        "quizData": [
            { "question": "2 + 2?", "answers": ["3", "4", "5", "6"], "correct": 2 },
            { "prompt": "Capital of France?", "answerChoices": ["Paris", "Rome", "Oslo", "Bern"], "correctChoiceIndex": 1 }
        ],
        "rateQuizData": [
            { "question": "Largest moon?", "answers": ["Io", "Titan", "Ganymede", "Europa"], "correct": 3 }
        ]
    }"#;

    #[tokio::test]
    async fn loads_rules_and_both_pools() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let rules_path = temp.path().join("gamerule.json");
        let questions_path = temp.path().join("quiz.json");
        fs::write(&rules_path, RULES)?;
        fs::write(&questions_path, QUESTIONS)?;

        let quiz = QuizLoader::new(&rules_path, &questions_path).load().await?;
        assert_eq!(quiz.rules.lives, 3);
        assert_eq!(quiz.rules.question_count, 5);
        assert_eq!(quiz.rules.rare_score, 5);
        assert_eq!(quiz.bank.pool(PoolKind::Regular).len(), 2);
        assert_eq!(quiz.bank.pool(PoolKind::Rare).len(), 1);
        assert_eq!(quiz.bank.pool(PoolKind::Regular)[1].prompt, "Capital of France?");
        assert_eq!(quiz.bank.pool(PoolKind::Rare)[0].correct_choice_index, 3);
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let loader = QuizLoader::new(temp.path().join("nope.json"), temp.path().join("quiz.json"));
        let err = loader.load().await.expect_err("missing rules file");
        assert!(matches!(err, QuizError::Read { ref path, .. } if path.ends_with("nope.json")));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_names_the_file() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let rules_path = temp.path().join("gamerule.json");
        let questions_path = temp.path().join("quiz.json");
        fs::write(&rules_path, RULES)?;
        fs::write(&questions_path, "{ not json")?;

        let err = QuizLoader::new(&rules_path, &questions_path)
            .load()
            .await
            .expect_err("broken question file");
        assert!(matches!(err, QuizError::Parse { ref path, .. } if path == &questions_path));
        Ok(())
    }

    #[test]
    fn rejects_invalid_rules() {
        let err = parse_rules(
            r#"{"lives":0,"questionCount":5,"rareQuestionChance":0.1,"timeLimit":10,"regularScore":1,"rareScore":2}"#,
        )
        .expect_err("zero lives");
        assert!(matches!(
            err,
            QuizError::Configuration(ConfigurationError::ZeroLives)
        ));
    }

    #[test]
    fn rejects_wrong_choice_count() {
        let err = parse_question_bank(
            r#"{"quizData":[{"question":"?","answers":["a","b","c"],"correct":1}]}"#,
        )
        .expect_err("three answers");
        assert!(matches!(
            err,
            QuizError::Configuration(ConfigurationError::WrongChoiceCount {
                pool: "regular",
                index: 0,
                found: 3
            })
        ));
    }

    #[test]
    fn rejects_correct_index_out_of_range() {
        for correct in [0, 5, -1, 300] {
            let content = format!(
                r#"{{"rareQuizData":[{{"question":"?","answers":["a","b","c","d"],"correct":{correct}}}]}}"#
            );
            let err = parse_question_bank(&content).expect_err("bad index");
            assert!(matches!(
                err,
                QuizError::Configuration(ConfigurationError::CorrectChoiceOutOfRange {
                    pool: "rare",
                    ..
                })
            ));
        }
    }

    #[test]
    fn empty_bank_is_rejected() {
        let bank = parse_question_bank("{}").expect("both pools may be absent");
        assert!(bank.is_empty());
        let err = LoadedQuiz::new(GameRules::default(), bank).expect_err("no questions");
        assert!(matches!(
            err,
            QuizError::Configuration(ConfigurationError::NoQuestions)
        ));
    }
}
