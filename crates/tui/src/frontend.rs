use std::{collections::HashMap, time::Duration};

use quiz_core::{
    models::{PoolKind, Question},
    session::{Outcome, RenderSink, ResultSink, Scheduler, Timer},
};
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::{debug, warn};

use crate::app::AppEvent;

/// How the last turn was decided, as shown on the answer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub selected: Option<u8>,
    pub correct: u8,
    pub is_correct: bool,
}

/// Everything the play screen draws.
#[derive(Debug, Clone, Default)]
pub struct PlayView {
    pub question: Option<Question>,
    pub pool: Option<PoolKind>,
    pub feedback: Option<Feedback>,
    pub lives_remaining: u32,
    pub current_index: u32,
    pub question_count: u32,
    pub seconds_remaining: u32,
}

/// Spawns one tokio task per timer and aborts it on cancel.
pub struct TimerScheduler {
    sender: mpsc::Sender<AppEvent>,
    handles: HashMap<Timer, JoinHandle<()>>,
}

impl TimerScheduler {
    pub fn new(sender: mpsc::Sender<AppEvent>) -> Self {
        Self {
            sender,
            handles: HashMap::new(),
        }
    }

    /// Forget a timer whose expiry has been delivered.
    pub fn complete(&mut self, timer: Timer) {
        self.handles.remove(&timer);
    }

    /// Abort every outstanding timer.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.handles.len()
    }
}

impl Scheduler for TimerScheduler {
    fn schedule(&mut self, timer: Timer, delay: Duration) {
        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            if sender.send(AppEvent::Timer(timer)).await.is_err() {
                debug!(?timer, "Event loop closed before timer fired");
            }
        });
        if let Some(previous) = self.handles.insert(timer, handle) {
            warn!(?timer, "Timer scheduled twice");
            previous.abort();
        }
    }

    fn cancel(&mut self, timer: Timer) {
        if let Some(handle) = self.handles.remove(&timer) {
            handle.abort();
        }
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// Terminal side of the turn controller: view state, timers and the outcome.
pub struct TerminalFrontend {
    pub view: PlayView,
    pub scheduler: TimerScheduler,
    pub outcome: Option<Outcome>,
}

impl TerminalFrontend {
    pub fn new(sender: mpsc::Sender<AppEvent>) -> Self {
        Self {
            view: PlayView::default(),
            scheduler: TimerScheduler::new(sender),
            outcome: None,
        }
    }
}

impl RenderSink for TerminalFrontend {
    fn show_question(&mut self, question: &Question, kind: PoolKind) {
        self.view.question = Some(question.clone());
        self.view.pool = Some(kind);
        self.view.feedback = None;
    }

    fn show_resolution(&mut self, selected: Option<u8>, correct: u8, is_correct: bool) {
        self.view.feedback = Some(Feedback {
            selected,
            correct,
            is_correct,
        });
    }

    fn update_hud(&mut self, lives_remaining: u32, current_index: u32, question_count: u32) {
        self.view.lives_remaining = lives_remaining;
        self.view.current_index = current_index;
        self.view.question_count = question_count;
    }

    fn update_countdown(&mut self, seconds_remaining: u32) {
        self.view.seconds_remaining = seconds_remaining;
    }
}

impl ResultSink for TerminalFrontend {
    fn report_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}

impl Scheduler for TerminalFrontend {
    fn schedule(&mut self, timer: Timer, delay: Duration) {
        self.scheduler.schedule(timer, delay);
    }

    fn cancel(&mut self, timer: Timer) {
        self.scheduler.cancel(timer);
    }
}
