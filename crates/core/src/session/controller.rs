//! Turn and session life cycle.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::{
    data::LoadedQuiz,
    models::{is_choice_in_range, GameRules},
};

use super::{
    frontend::{Frontend, Scheduler, Timer, TimerKind},
    selector::{QuestionSelector, Selection},
    state::{EndReason, Phase, SessionState, TurnResolution},
};

/// Delay between resolving a turn and moving on, so feedback stays visible.
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(1500);

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Owns one session and drives it from frontend events.
///
/// All methods that can change what is on screen take the [`Frontend`] so the
/// controller can render, schedule and cancel timers, and report the outcome.
/// At most one timer is pending at any time; a timer that is not the pending
/// one is ignored when delivered.
pub struct TurnController<R> {
    rules: GameRules,
    selector: QuestionSelector<R>,
    state: SessionState,
    phase: Phase,
    pending: Option<Timer>,
    next_timer_id: u64,
    feedback_delay: Duration,
}

impl<R: Rng> TurnController<R> {
    pub fn new(quiz: LoadedQuiz, rng: R) -> Self {
        let state = SessionState::new(&quiz.rules);
        Self {
            rules: quiz.rules,
            selector: QuestionSelector::new(quiz.bank, rng),
            state,
            phase: Phase::Idle,
            pending: None,
            next_timer_id: 0,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }

    pub fn with_feedback_delay(mut self, delay: Duration) -> Self {
        self.feedback_delay = delay;
        self
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Timer the controller is currently waiting for, if any.
    pub fn pending_timer(&self) -> Option<Timer> {
        self.pending
    }

    /// True between `start_session` and the end of the session.
    pub fn is_running(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::SessionEnded(_))
    }

    /// Reset all counters and show the first question.
    pub fn start_session<F: Frontend>(&mut self, frontend: &mut F) {
        self.cancel_pending(frontend);
        self.state = SessionState::new(&self.rules);
        self.phase = Phase::AwaitingQuestion;
        info!(
            lives = self.rules.lives,
            question_count = self.rules.question_count,
            "Session started"
        );
        self.advance(frontend);
    }

    /// Tear the session down without reporting an outcome.
    pub fn abandon<F: Frontend>(&mut self, frontend: &mut F) {
        self.cancel_pending(frontend);
        if self.is_running() {
            info!(index = self.state.current_index, "Session abandoned");
            self.phase = Phase::Idle;
        }
    }

    /// Deliver an expired timer.
    pub fn handle_timer<F: Frontend>(&mut self, timer: Timer, frontend: &mut F) {
        if self.pending != Some(timer) {
            debug!(?timer, pending = ?self.pending, "Ignoring stale timer");
            return;
        }
        self.pending = None;
        match timer.kind {
            TimerKind::Countdown => self.tick(frontend),
            TimerKind::Resolution => self.decide(frontend),
        }
    }

    /// Answer the current question with a one-based `choice`.
    ///
    /// Returns `false` and changes nothing when no question is awaiting an
    /// answer or the choice is out of range.
    pub fn submit_answer<F: Frontend>(&mut self, choice: u8, frontend: &mut F) -> bool {
        if self.phase != Phase::QuestionShown || !is_choice_in_range(choice) {
            debug!(choice, phase = ?self.phase, "Ignoring answer");
            return false;
        }
        let (correct_choice, correct, pool) =
            match (&self.state.current_question, self.state.current_pool) {
                (Some(question), Some(pool)) => {
                    (question.correct_choice_index, question.is_correct(choice), pool)
                }
                _ => return false,
            };

        self.cancel_pending(frontend);
        if correct {
            self.state.score = self.state.score.saturating_add(self.rules.score_for(pool));
            self.state.correct_count += 1;
        } else {
            self.state.lives_remaining = self.state.lives_remaining.saturating_sub(1);
        }
        debug!(
            choice,
            correct,
            score = self.state.score,
            lives = self.state.lives_remaining,
            "Answer submitted"
        );

        frontend.show_resolution(Some(choice), correct_choice, correct);
        self.render_hud(frontend);
        self.resolve(TurnResolution::Answered { choice, correct }, frontend);
        true
    }

    fn advance<F: Frontend>(&mut self, frontend: &mut F) {
        if self.state.current_index >= self.rules.question_count
            && self.selector.is_exhausted(&self.state.used)
        {
            self.end_session(EndReason::QuestionBudgetReached, frontend);
            return;
        }

        let chance = self.rules.rare_question_chance;
        match self.selector.select_next(chance, &mut self.state.used) {
            Selection::Exhausted => self.end_session(EndReason::PoolsExhausted, frontend),
            Selection::Question { question, kind, .. } => {
                self.state.seconds_remaining = self.rules.time_limit;
                self.phase = Phase::QuestionShown;
                frontend.show_question(&question, kind);
                self.state.current_question = Some(question);
                self.state.current_pool = Some(kind);
                self.render_hud(frontend);
                frontend.update_countdown(self.state.seconds_remaining);
                self.schedule(TimerKind::Countdown, TICK_INTERVAL, frontend);
            }
        }
    }

    fn tick<F: Frontend>(&mut self, frontend: &mut F) {
        if self.phase != Phase::QuestionShown {
            return;
        }
        self.state.seconds_remaining = self.state.seconds_remaining.saturating_sub(1);
        frontend.update_countdown(self.state.seconds_remaining);
        if self.state.seconds_remaining > 0 {
            self.schedule(TimerKind::Countdown, TICK_INTERVAL, frontend);
            return;
        }

        self.state.lives_remaining = self.state.lives_remaining.saturating_sub(1);
        debug!(lives = self.state.lives_remaining, "Question timed out");
        if let Some(question) = &self.state.current_question {
            frontend.show_resolution(None, question.correct_choice_index, false);
        }
        self.render_hud(frontend);
        self.resolve(TurnResolution::TimedOut, frontend);
    }

    fn resolve<F: Frontend>(&mut self, resolution: TurnResolution, frontend: &mut F) {
        self.phase = Phase::TurnResolved(resolution);
        self.schedule(TimerKind::Resolution, self.feedback_delay, frontend);
    }

    fn decide<F: Frontend>(&mut self, frontend: &mut F) {
        if !matches!(self.phase, Phase::TurnResolved(_)) {
            return;
        }
        if self.state.lives_remaining == 0 {
            self.end_session(EndReason::OutOfLives, frontend);
        } else if self.state.current_index + 1 >= self.rules.question_count {
            self.end_session(EndReason::QuestionBudgetReached, frontend);
        } else {
            self.state.current_index += 1;
            self.phase = Phase::AwaitingQuestion;
            self.advance(frontend);
        }
    }

    fn end_session<F: Frontend>(&mut self, reason: EndReason, frontend: &mut F) {
        self.cancel_pending(frontend);
        self.phase = Phase::SessionEnded(reason);
        let outcome = self.state.outcome(reason);
        info!(
            score = outcome.score,
            lives = outcome.lives_remaining,
            correct = outcome.correct_count,
            served = outcome.questions_served,
            reason = ?reason,
            "Session ended"
        );
        frontend.report_outcome(outcome);
    }

    fn render_hud<F: Frontend>(&self, frontend: &mut F) {
        frontend.update_hud(
            self.state.lives_remaining,
            self.state.current_index,
            self.rules.question_count,
        );
    }

    fn schedule<F: Frontend>(&mut self, kind: TimerKind, delay: Duration, frontend: &mut F) {
        self.cancel_pending(frontend);
        self.next_timer_id += 1;
        let timer = Timer {
            kind,
            id: self.next_timer_id,
        };
        self.pending = Some(timer);
        frontend.schedule(timer, delay);
    }

    fn cancel_pending<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(timer) = self.pending.take() {
            scheduler.cancel(timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        models::{PoolKind, Question, QuestionBank},
        session::{
            frontend::{RenderSink, ResultSink},
            state::Outcome,
        },
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Shown {
        Question(String, PoolKind),
        Resolution(Option<u8>, u8, bool),
    }

    #[derive(Default)]
    struct Recorder {
        shown: Vec<Shown>,
        hud: Vec<(u32, u32, u32)>,
        countdown: Vec<u32>,
        scheduled: Vec<(Timer, Duration)>,
        cancelled: Vec<Timer>,
        outcomes: Vec<Outcome>,
    }

    impl Recorder {
        fn questions(&self) -> Vec<String> {
            self.shown
                .iter()
                .filter_map(|entry| match entry {
                    Shown::Question(prompt, _) => Some(prompt.clone()),
                    Shown::Resolution(..) => None,
                })
                .collect()
        }

        fn last_timer(&self) -> Timer {
            self.scheduled.last().expect("a timer was scheduled").0
        }
    }

    impl RenderSink for Recorder {
        fn show_question(&mut self, question: &Question, kind: PoolKind) {
            self.shown.push(Shown::Question(question.prompt.clone(), kind));
        }

        fn show_resolution(&mut self, selected: Option<u8>, correct: u8, is_correct: bool) {
            self.shown
                .push(Shown::Resolution(selected, correct, is_correct));
        }

        fn update_hud(&mut self, lives_remaining: u32, current_index: u32, question_count: u32) {
            self.hud
                .push((lives_remaining, current_index, question_count));
        }

        fn update_countdown(&mut self, seconds_remaining: u32) {
            self.countdown.push(seconds_remaining);
        }
    }

    impl ResultSink for Recorder {
        fn report_outcome(&mut self, outcome: Outcome) {
            self.outcomes.push(outcome);
        }
    }

    impl Scheduler for Recorder {
        fn schedule(&mut self, timer: Timer, delay: Duration) {
            self.scheduled.push((timer, delay));
        }

        fn cancel(&mut self, timer: Timer) {
            self.cancelled.push(timer);
        }
    }

    fn question(prompt: String, correct: u8) -> Question {
        Question::new(prompt, ["a", "b", "c", "d"].map(String::from), correct)
            .expect("valid question")
    }

    fn quiz(rules: GameRules, regular: usize, rare: usize) -> LoadedQuiz {
        let bank = QuestionBank::new(
            (0..regular).map(|i| question(format!("regular {i}"), 1)).collect(),
            (0..rare).map(|i| question(format!("rare {i}"), 2)).collect(),
        );
        LoadedQuiz::new(rules, bank).expect("valid quiz")
    }

    fn rules(lives: u32, question_count: u32) -> GameRules {
        GameRules {
            lives,
            question_count,
            rare_question_chance: 0.3,
            time_limit: 3,
            regular_score: 10,
            rare_score: 25,
        }
    }

    fn controller(quiz: LoadedQuiz) -> TurnController<StdRng> {
        TurnController::new(quiz, StdRng::seed_from_u64(9))
    }

    fn correct_choice(controller: &TurnController<StdRng>) -> u8 {
        controller
            .state()
            .current_question
            .as_ref()
            .expect("question shown")
            .correct_choice_index
    }

    fn wrong_choice(controller: &TurnController<StdRng>) -> u8 {
        correct_choice(controller) % 4 + 1
    }

    /// Fire the pending timer, the way the frontend would after its delay.
    fn fire(controller: &mut TurnController<StdRng>, recorder: &mut Recorder) {
        let timer = controller.pending_timer().expect("pending timer");
        assert_eq!(timer, recorder.last_timer());
        controller.handle_timer(timer, recorder);
    }

    fn run_out_clock(controller: &mut TurnController<StdRng>, recorder: &mut Recorder) {
        while controller.phase() == Phase::QuestionShown {
            fire(controller, recorder);
        }
    }

    #[test]
    fn start_session_shows_first_question() {
        let mut controller = controller(quiz(rules(3, 5), 4, 2));
        let mut recorder = Recorder::default();
        assert_eq!(controller.phase(), Phase::Idle);

        controller.start_session(&mut recorder);

        assert_eq!(controller.phase(), Phase::QuestionShown);
        assert_eq!(recorder.questions().len(), 1);
        assert_eq!(recorder.hud, vec![(3, 0, 5)]);
        assert_eq!(recorder.countdown, vec![3]);
        let (timer, delay) = recorder.scheduled[0];
        assert_eq!(timer.kind, TimerKind::Countdown);
        assert_eq!(delay, TICK_INTERVAL);
        assert_eq!(controller.state().lives_remaining, 3);
        assert_eq!(controller.state().score, 0);
    }

    #[test]
    fn countdown_ticks_then_times_out() {
        let mut controller = controller(quiz(rules(3, 5), 4, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let correct = correct_choice(&controller);

        run_out_clock(&mut controller, &mut recorder);

        assert_eq!(recorder.countdown, vec![3, 2, 1, 0]);
        assert_eq!(
            controller.phase(),
            Phase::TurnResolved(TurnResolution::TimedOut)
        );
        assert_eq!(controller.state().lives_remaining, 2);
        assert_eq!(controller.state().score, 0);
        assert_eq!(controller.state().correct_count, 0);
        assert_eq!(
            recorder.shown.last(),
            Some(&Shown::Resolution(None, correct, false))
        );
        let (timer, delay) = *recorder.scheduled.last().expect("resolution timer");
        assert_eq!(timer.kind, TimerKind::Resolution);
        assert_eq!(delay, DEFAULT_FEEDBACK_DELAY);
    }

    #[test]
    fn always_timing_out_ends_after_lives_run_out() {
        let mut controller = controller(quiz(rules(3, 5), 10, 10));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);

        let mut turns = 0;
        while controller.is_running() {
            run_out_clock(&mut controller, &mut recorder);
            turns += 1;
            fire(&mut controller, &mut recorder);
        }

        assert_eq!(turns, 3);
        assert_eq!(controller.phase(), Phase::SessionEnded(EndReason::OutOfLives));
        assert_eq!(controller.state().lives_remaining, 0);
        assert_eq!(recorder.outcomes.len(), 1);
        assert_eq!(recorder.outcomes[0].lives_remaining, 0);
        assert_eq!(recorder.outcomes[0].questions_served, 3);
        assert_eq!(controller.pending_timer(), None);
    }

    #[test]
    fn correct_answer_scores_by_pool() {
        let mut controller = controller(quiz(rules(3, 20), 5, 5));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);

        let mut expected = 0;
        while controller.is_running() {
            let pool = controller.state().current_pool.expect("pool recorded");
            let before = controller.state().score;
            let choice = correct_choice(&controller);
            assert!(controller.submit_answer(choice, &mut recorder));
            expected += controller.rules().score_for(pool);
            assert_eq!(controller.state().score - before, controller.rules().score_for(pool));
            assert_eq!(controller.state().lives_remaining, 3);
            fire(&mut controller, &mut recorder);
        }

        assert_eq!(controller.state().score, expected);
        assert_eq!(controller.state().correct_count, 10);
        assert_eq!(
            controller.phase(),
            Phase::SessionEnded(EndReason::PoolsExhausted)
        );
        assert_eq!(recorder.outcomes[0].score, expected);
    }

    #[test]
    fn wrong_answer_costs_exactly_one_life() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let countdown_timer = controller.pending_timer().expect("countdown");

        let choice = wrong_choice(&controller);
        assert!(controller.submit_answer(choice, &mut recorder));

        assert_eq!(controller.state().lives_remaining, 2);
        assert_eq!(controller.state().score, 0);
        assert_eq!(controller.state().correct_count, 0);
        assert!(recorder.cancelled.contains(&countdown_timer));
        assert_eq!(
            controller.phase(),
            Phase::TurnResolved(TurnResolution::Answered {
                choice,
                correct: false
            })
        );
        assert_eq!(
            recorder.shown.last(),
            Some(&Shown::Resolution(Some(choice), 1, false))
        );
    }

    #[test]
    fn double_submit_mutates_once() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);

        let choice = wrong_choice(&controller);
        assert!(controller.submit_answer(choice, &mut recorder));
        assert!(!controller.submit_answer(choice, &mut recorder));
        assert_eq!(controller.state().lives_remaining, 2);

        fire(&mut controller, &mut recorder);
        let choice = correct_choice(&controller);
        assert!(controller.submit_answer(choice, &mut recorder));
        assert!(!controller.submit_answer(choice, &mut recorder));
        assert_eq!(controller.state().score, 10);
        assert_eq!(controller.state().correct_count, 1);
    }

    #[test]
    fn out_of_range_choice_is_ignored() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let before = controller.state().clone();

        assert!(!controller.submit_answer(0, &mut recorder));
        assert!(!controller.submit_answer(5, &mut recorder));

        assert_eq!(controller.state(), &before);
        assert_eq!(controller.phase(), Phase::QuestionShown);
    }

    #[test]
    fn answer_before_start_is_ignored() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        assert!(!controller.submit_answer(1, &mut recorder));
        assert!(recorder.shown.is_empty());
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn stale_countdown_after_answer_is_ignored() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let stale = controller.pending_timer().expect("countdown");

        let choice = correct_choice(&controller);
        controller.submit_answer(choice, &mut recorder);
        let resolution = controller.pending_timer();
        let lives = controller.state().lives_remaining;
        let ticks = recorder.countdown.len();

        controller.handle_timer(stale, &mut recorder);

        assert_eq!(controller.state().lives_remaining, lives);
        assert_eq!(recorder.countdown.len(), ticks);
        assert_eq!(controller.pending_timer(), resolution);
        assert!(matches!(controller.phase(), Phase::TurnResolved(_)));
    }

    #[test]
    fn late_click_after_timeout_is_ignored() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        run_out_clock(&mut controller, &mut recorder);

        let choice = correct_choice(&controller);
        assert!(!controller.submit_answer(choice, &mut recorder));
        assert_eq!(controller.state().lives_remaining, 2);
        assert_eq!(controller.state().score, 0);
    }

    #[test]
    fn exhaustion_ends_session_early() {
        let rules = GameRules {
            rare_question_chance: 1.0,
            ..rules(3, 10)
        };
        let mut controller = controller(quiz(rules, 2, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);

        while controller.is_running() {
            let choice = correct_choice(&controller);
            controller.submit_answer(choice, &mut recorder);
            fire(&mut controller, &mut recorder);
        }

        let served: HashSet<String> = recorder.questions().into_iter().collect();
        assert_eq!(recorder.questions().len(), 2);
        assert_eq!(served.len(), 2);
        assert_eq!(
            controller.phase(),
            Phase::SessionEnded(EndReason::PoolsExhausted)
        );
        assert_eq!(recorder.outcomes.len(), 1);
        assert_eq!(recorder.outcomes[0].correct_count, 2);
        assert_eq!(recorder.outcomes[0].questions_served, 2);
    }

    #[test]
    fn single_question_budget_ends_after_one_turn() {
        let mut controller = controller(quiz(rules(5, 1), 5, 5));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);

        let choice = wrong_choice(&controller);
        controller.submit_answer(choice, &mut recorder);
        fire(&mut controller, &mut recorder);

        assert_eq!(
            controller.phase(),
            Phase::SessionEnded(EndReason::QuestionBudgetReached)
        );
        assert_eq!(recorder.questions().len(), 1);
        assert_eq!(recorder.outcomes[0].lives_remaining, 4);
    }

    #[test]
    fn lives_never_increase_and_drop_by_one() {
        let mut controller = controller(quiz(rules(4, 8), 6, 6));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);

        let mut turn = 0;
        while controller.is_running() {
            let before = controller.state().lives_remaining;
            match turn % 3 {
                0 => {
                    let choice = correct_choice(&controller);
                    controller.submit_answer(choice, &mut recorder);
                    assert_eq!(controller.state().lives_remaining, before);
                }
                1 => {
                    let choice = wrong_choice(&controller);
                    controller.submit_answer(choice, &mut recorder);
                    assert_eq!(controller.state().lives_remaining, before - 1);
                }
                _ => {
                    run_out_clock(&mut controller, &mut recorder);
                    assert_eq!(controller.state().lives_remaining, before - 1);
                }
            }
            assert!(controller.state().lives_remaining <= controller.rules().lives);
            fire(&mut controller, &mut recorder);
            turn += 1;
        }
        assert_eq!(recorder.outcomes.len(), 1);
    }

    #[test]
    fn restart_resets_counters() {
        let mut controller = controller(quiz(rules(1, 3), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let choice = wrong_choice(&controller);
        controller.submit_answer(choice, &mut recorder);
        fire(&mut controller, &mut recorder);
        assert_eq!(controller.phase(), Phase::SessionEnded(EndReason::OutOfLives));

        controller.start_session(&mut recorder);

        assert_eq!(controller.phase(), Phase::QuestionShown);
        assert_eq!(controller.state().lives_remaining, 1);
        assert_eq!(controller.state().current_index, 0);
        assert_eq!(controller.state().used.len(), 1);
    }

    #[test]
    fn abandon_cancels_pending_resolution() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let choice = correct_choice(&controller);
        controller.submit_answer(choice, &mut recorder);
        let resolution = controller.pending_timer().expect("resolution pending");

        controller.abandon(&mut recorder);

        assert_eq!(controller.phase(), Phase::Idle);
        assert!(recorder.cancelled.contains(&resolution));
        controller.handle_timer(resolution, &mut recorder);
        assert_eq!(controller.phase(), Phase::Idle);
        assert!(recorder.outcomes.is_empty());
    }

    #[test]
    fn score_saturates_on_huge_rewards() {
        let rules = GameRules {
            rare_question_chance: 0.0,
            regular_score: i64::MAX,
            ..rules(3, 5)
        };
        let mut controller = controller(quiz(rules, 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);

        for _ in 0..2 {
            let choice = correct_choice(&controller);
            assert!(controller.submit_answer(choice, &mut recorder));
            fire(&mut controller, &mut recorder);
        }

        assert_eq!(controller.state().score, i64::MAX);
        assert_eq!(controller.state().correct_count, 2);
    }

    #[test]
    fn consumed_resolution_timer_is_ignored() {
        let mut controller = controller(quiz(rules(3, 5), 5, 0));
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let choice = correct_choice(&controller);
        controller.submit_answer(choice, &mut recorder);
        let resolution = controller.pending_timer().expect("resolution");
        assert_eq!(resolution.kind, TimerKind::Resolution);

        controller.handle_timer(resolution, &mut recorder);
        assert_eq!(controller.phase(), Phase::QuestionShown);
        let index = controller.state().current_index;
        let served = controller.state().used.len();
        let countdown = controller.pending_timer();

        controller.handle_timer(resolution, &mut recorder);

        assert_eq!(controller.state().current_index, index);
        assert_eq!(controller.state().used.len(), served);
        assert_eq!(controller.pending_timer(), countdown);
        assert_eq!(controller.phase(), Phase::QuestionShown);
    }

    #[test]
    fn custom_feedback_delay_is_scheduled() {
        let delay = Duration::from_millis(10);
        let mut controller = controller(quiz(rules(3, 5), 5, 0)).with_feedback_delay(delay);
        let mut recorder = Recorder::default();
        controller.start_session(&mut recorder);
        let choice = correct_choice(&controller);
        controller.submit_answer(choice, &mut recorder);
        assert_eq!(recorder.scheduled.last().map(|(_, d)| *d), Some(delay));
    }
}
