use std::{io, thread, time::Duration};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quiz_core::{
    config::AppConfig,
    data::LoadedQuiz,
    error::QuizResult,
    models::{format_clock, PoolKind, CHOICES_PER_QUESTION},
    session::{Outcome, Phase, Timer, TurnController},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::{
    block_font,
    frontend::{Feedback, TerminalFrontend},
};

const TICK_RATE: Duration = Duration::from_millis(250);
const LOW_TIME_WARNING: u32 = 5;
const FULL_HEART: &str = "♥";
const EMPTY_HEART: &str = "♡";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Loading,
    Play,
    Results,
    Failed(String),
}

/// Events funnelled into the single-threaded app loop.
pub enum AppEvent {
    Input(Event),
    Tick,
    Timer(Timer),
    QuizLoaded(QuizResult<LoadedQuiz>),
}

/// Terminal quiz application.
pub struct QuizApp {
    config: AppConfig,
    screen: Screen,
    controller: Option<TurnController<StdRng>>,
    frontend: TerminalFrontend,
    event_tx: mpsc::Sender<AppEvent>,
    event_rx: Option<mpsc::Receiver<AppEvent>>,
    status: String,
    loaded_at: Option<DateTime<Local>>,
    finished_at: Option<DateTime<Local>>,
    should_quit: bool,
    theme: Theme,
}

impl QuizApp {
    pub fn new(config: AppConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel::<AppEvent>(128);
        Self {
            config,
            screen: Screen::Loading,
            controller: None,
            frontend: TerminalFrontend::new(event_tx.clone()),
            event_tx,
            event_rx: Some(event_rx),
            status: "Loading quiz data…".to_string(),
            loaded_at: None,
            finished_at: None,
            should_quit: false,
            theme: Theme::default(),
        }
    }

    /// Run until the player quits. Returns the outcome of the last finished session.
    pub async fn run(&mut self) -> Result<Option<Outcome>> {
        let mut event_rx = self
            .event_rx
            .take()
            .ok_or_else(|| anyhow!("event loop already running"))?;

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        spawn_input_thread(self.event_tx.clone());
        self.start_load();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }

            if self.should_quit {
                break;
            }
        }

        if let Some(controller) = self.controller.as_mut() {
            controller.abandon(&mut self.frontend);
        }
        self.frontend.scheduler.cancel_all();
        restore_terminal(&mut terminal)?;
        Ok(self.frontend.outcome)
    }

    fn start_load(&mut self) {
        let loader = self.config.loader();
        let sender = self.event_tx.clone();
        info!(
            rules = %loader.rules_path().display(),
            questions = %loader.questions_path().display(),
            "Loading quiz data"
        );
        tokio::spawn(async move {
            let result = loader.load().await;
            if sender.send(AppEvent::QuizLoaded(result)).await.is_err() {
                error!("Event loop closed before quiz data finished loading");
            }
        });
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.status = format!("Error: {err}");
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::Timer(timer)) => {
                self.frontend.scheduler.complete(timer);
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_timer(timer, &mut self.frontend);
                }
                self.sync_screen();
                true
            }
            Some(AppEvent::QuizLoaded(result)) => {
                self.handle_loaded(result);
                true
            }
            None => false,
        }
    }

    fn handle_loaded(&mut self, result: QuizResult<LoadedQuiz>) {
        match result {
            Ok(quiz) => {
                let loaded_at = quiz.loaded_at.with_timezone(&Local);
                info!(%loaded_at, "Starting quiz");
                self.loaded_at = Some(loaded_at);
                let rng = match self.config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let mut controller =
                    TurnController::new(quiz, rng).with_feedback_delay(self.config.feedback_delay());
                controller.start_session(&mut self.frontend);
                self.controller = Some(controller);
                self.status = format!(
                    "Quiz loaded at {}. Press 1-4 to answer, q to quit",
                    loaded_at.format("%H:%M:%S")
                );
                self.sync_screen();
            }
            Err(err) => {
                error!(?err, "Quiz data failed to load");
                let mut message = err.to_string();
                let mut source = std::error::Error::source(&err);
                while let Some(cause) = source {
                    message.push_str(&format!(": {cause}"));
                    source = cause.source();
                }
                self.screen = Screen::Failed(message);
                self.status = "Press q to quit".to_string();
            }
        }
    }

    fn sync_screen(&mut self) {
        let Some(controller) = self.controller.as_ref() else {
            return;
        };
        match controller.phase() {
            Phase::SessionEnded(_) => {
                if self.screen != Screen::Results {
                    self.finished_at = Some(Local::now());
                    self.status = "Press r to play again, q to quit".to_string();
                }
                self.screen = Screen::Results;
            }
            Phase::Idle => {}
            _ => self.screen = Screen::Play,
        }
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            _ => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(ch @ '1'..='4') if self.screen == Screen::Play => {
                let choice = ch as u8 - b'0';
                if let Some(controller) = self.controller.as_mut() {
                    controller.submit_answer(choice, &mut self.frontend);
                }
                self.sync_screen();
            }
            KeyCode::Char('r') | KeyCode::Char('R') if self.screen == Screen::Results => {
                let controller = self
                    .controller
                    .as_mut()
                    .ok_or_else(|| anyhow!("quiz data not loaded"))?;
                self.frontend.outcome = None;
                self.finished_at = None;
                controller.start_session(&mut self.frontend);
                self.status = "Press 1-4 to answer, q to quit".to_string();
                self.sync_screen();
            }
            _ => {}
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        match &self.screen {
            Screen::Loading => self.draw_message(frame, layout[0], "Loading", &self.status),
            Screen::Failed(message) => {
                self.draw_message(frame, layout[0], "Could not start quiz", message)
            }
            Screen::Play => self.draw_play(frame, layout[0]),
            Screen::Results => self.draw_results(frame, layout[0]),
        }
        self.render_status(frame, layout[1]);
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, title: &str, message: &str) {
        let width = 60.min(area.width);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string());
        let paragraph = Paragraph::new(message.to_string())
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered_rect(width, 7, area));
    }

    fn draw_play(&self, frame: &mut Frame, area: Rect) {
        let view = &self.frontend.view;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(block_font::HEIGHT as u16 + 2),
                Constraint::Min(3),
                Constraint::Length(CHOICES_PER_QUESTION as u16 + 3),
            ])
            .split(area);

        self.render_hud(frame, layout[0]);
        self.render_clock(frame, layout[1]);

        let prompt = view
            .question
            .as_ref()
            .map(|question| question.prompt.clone())
            .unwrap_or_default();
        let title = match view.pool {
            Some(PoolKind::Rare) => "Rare question",
            _ => "Question",
        };
        let prompt = Paragraph::new(Line::from(Span::styled(
            prompt,
            Style::default()
                .fg(self.theme.primary_fg)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(title))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(prompt, layout[2]);

        self.render_answers(frame, layout[3]);
    }

    fn render_hud(&self, frame: &mut Frame, area: Rect) {
        let view = &self.frontend.view;
        let max_lives = self
            .controller
            .as_ref()
            .map(|controller| controller.rules().lives)
            .unwrap_or(view.lives_remaining);
        let lost = max_lives.saturating_sub(view.lives_remaining);

        let mut spans = vec![
            Span::raw("Hp: "),
            Span::styled(
                FULL_HEART.repeat(view.lives_remaining as usize),
                Style::default().fg(self.theme.danger),
            ),
            Span::styled(
                EMPTY_HEART.repeat(lost as usize),
                Style::default().fg(self.theme.muted),
            ),
            Span::raw(format!(
                "    Question: {}/{}",
                view.current_index + 1,
                view.question_count
            )),
        ];
        if view.pool == Some(PoolKind::Rare) {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                " RARE ",
                Style::default()
                    .fg(Color::Black)
                    .bg(self.theme.warning)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Timed Quiz"));
        frame.render_widget(paragraph, area);
    }

    fn render_clock(&self, frame: &mut Frame, area: Rect) {
        let seconds = self.frontend.view.seconds_remaining;
        let color = if seconds <= LOW_TIME_WARNING {
            self.theme.warning
        } else {
            self.theme.accent
        };
        let lines: Vec<Line> = block_font::render(&format_clock(seconds))
            .into_iter()
            .map(|line| {
                Line::from(Span::styled(
                    line,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            })
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Time"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_answers(&self, frame: &mut Frame, area: Rect) {
        let view = &self.frontend.view;
        let Some(question) = view.question.as_ref() else {
            return;
        };

        let mut lines: Vec<Line> = (1..=CHOICES_PER_QUESTION as u8)
            .map(|choice| {
                let text = question.choice(choice).unwrap_or_default();
                let style = answer_style(&self.theme, view.feedback, choice);
                Line::from(Span::styled(format!("[{choice}] {text}"), style))
            })
            .collect();

        if let Some(feedback) = view.feedback {
            let (label, color) = match (feedback.selected, feedback.is_correct) {
                (None, _) => ("Time's up!", self.theme.warning),
                (Some(_), true) => ("Correct!", self.theme.success),
                (Some(_), false) => ("Wrong answer", self.theme.danger),
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
        }

        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Answers"));
        frame.render_widget(paragraph, area);
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let Some(outcome) = self.frontend.outcome else {
            self.draw_message(frame, area, "Results", "No finished session");
            return;
        };

        let label = Style::default().fg(self.theme.muted);
        let value = Style::default()
            .fg(self.theme.primary_fg)
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(
                outcome.reason.describe(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(String::new()),
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(outcome.score.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Lives left: ", label),
                Span::styled(outcome.lives_remaining.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Correct answers: ", label),
                Span::styled(
                    format!("{}/{}", outcome.correct_count, outcome.questions_served),
                    value,
                ),
            ]),
        ];
        if let Some(loaded_at) = self.loaded_at {
            lines.push(Line::from(Span::styled(
                format!("Questions loaded {}", loaded_at.format("%Y-%m-%d %H:%M:%S")),
                label,
            )));
        }
        if let Some(finished_at) = self.finished_at {
            lines.push(Line::from(Span::styled(
                format!("Finished {}", finished_at.format("%Y-%m-%d %H:%M:%S")),
                label,
            )));
        }

        let height = lines.len() as u16 + 2;
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Results"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, centered_rect(44, height, area));
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let paragraph = Paragraph::new(Line::from(self.status.clone()))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn answer_style(theme: &Theme, feedback: Option<Feedback>, choice: u8) -> Style {
    match feedback {
        None => Style::default().fg(theme.primary_fg),
        Some(feedback) if feedback.correct == choice => Style::default()
            .fg(theme.success)
            .add_modifier(Modifier::BOLD),
        Some(feedback) if feedback.selected == Some(choice) => Style::default()
            .fg(theme.danger)
            .add_modifier(Modifier::CROSSED_OUT),
        Some(_) => Style::default().fg(theme.muted),
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
