//! Application configuration layered from defaults, a TOML file and the environment.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{data::QuizLoader, session::DEFAULT_FEEDBACK_DELAY};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "quiz";
/// File name of the user configuration.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `QUIZ_RULES_PATH`.
pub const ENV_PREFIX: &str = "QUIZ";

const DEFAULT_CONFIG_TOML: &str = r#"# Timed quiz configuration.
# Every key can also be set through the environment, e.g. QUIZ_RULES_PATH.

# Rule file (lives, questionCount, rareQuestionChance, timeLimit, regularScore, rareScore).
rules_path = "data/gamerule.json"

# Question file with `quizData` and `rareQuizData` lists.
questions_path = "data/quiz.json"

# How long answer feedback stays visible before the next question, in milliseconds.
feedback_delay_ms = 1500

# Fixed RNG seed for reproducible question order.
# seed = 42
"#;

/// Settings for locating quiz data and tuning the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the rule JSON file.
    pub rules_path: PathBuf,
    /// Path of the question JSON file.
    pub questions_path: PathBuf,
    /// Feedback delay after each turn, in milliseconds.
    pub feedback_delay_ms: u64,
    /// Optional RNG seed; a random seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_path: PathBuf::from("data/gamerule.json"),
            questions_path: PathBuf::from("data/quiz.json"),
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY.as_millis() as u64,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load from the default config file location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (optional) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layered(path.as_ref(), environment())
    }

    fn load_layered(path: &Path, environment: Environment) -> Result<Self> {
        let defaults = Self::default();
        if !path.exists() {
            warn!(path = %path.display(), "No configuration file, using defaults");
        }
        let settings = Config::builder()
            .set_default(
                "rules_path",
                defaults.rules_path.to_string_lossy().to_string(),
            )?
            .set_default(
                "questions_path",
                defaults.questions_path.to_string_lossy().to_string(),
            )?
            .set_default("feedback_delay_ms", defaults.feedback_delay_ms)?
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(environment)
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        let config: AppConfig = settings
            .try_deserialize()
            .context("failed to deserialize configuration")?;
        info!(
            rules = %config.rules_path.display(),
            questions = %config.questions_path.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Feedback delay as a [`Duration`].
    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    /// Loader for the configured rule and question files.
    pub fn loader(&self) -> QuizLoader {
        QuizLoader::new(&self.rules_path, &self.questions_path)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

/// Default location of `config.toml`.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Write the commented default configuration if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    ensure_default_config_at(config_path())
}

/// Write the commented default configuration to `path` if it is missing.
pub fn ensure_default_config_at(path: impl Into<PathBuf>) -> Result<PathBuf> {
    let path = path.into();
    if path.exists() {
        return Ok(path);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("failed to write default config {}", path.display()))?;
    info!(path = %path.display(), "Wrote default configuration");
    Ok(path)
}
