mod app;
mod block_font;
mod frontend;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use quiz_core::config::{self, AppConfig};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let mut app = app::QuizApp::new(config);
    let outcome = app.run().await?;

    match outcome {
        Some(outcome) => {
            println!("{}", outcome.reason.describe());
            println!("Score: {}", outcome.score);
            println!("Lives left: {}", outcome.lives_remaining);
            println!(
                "Correct answers: {}/{}",
                outcome.correct_count, outcome.questions_served
            );
        }
        None => println!("Quiz closed before the session finished."),
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("quiz.log");

    let env_filter = EnvFilter::from_default_env();

    // stdout belongs to the terminal UI, so only the file layer is installed.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(())
}
