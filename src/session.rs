//! State machine for a single quiz attempt.
//!
//! `Intro → Question(i) → Result(i) → … → Completed`, with a per-question
//! countdown. The driver calls [`QuizSession::tick`] once per second; the
//! tick only counts down while a question is open and unanswered, so a
//! stale timer can never fire into another phase.

use crate::models::Question;

/// Seconds allowed per question.
pub const QUESTION_TIME_SECS: u32 = 30;

/// Remaining seconds at or below which the countdown renders as a warning.
pub const LOW_TIME_SECS: u32 = 10;

const NUM_OPTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Title screen, shown once per session.
    Intro,
    /// A question is open and the countdown is running.
    Question,
    /// The answer (or timeout) is shown together with the explanation.
    Result,
    /// Final score screen; terminal until an explicit restart.
    Completed,
}

pub struct QuizSession {
    questions: Vec<Question>,
    phase: Phase,
    cursor: usize,
    highlighted: usize,
    answer: Option<usize>,
    score: usize,
    remaining: u32,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            phase: Phase::Intro,
            cursor: 0,
            highlighted: 0,
            answer: None,
            score: 0,
            remaining: QUESTION_TIME_SECS,
        }
    }

    /// Leaves the intro. An empty question set goes straight to
    /// `Completed` rather than inventing scoring semantics for it.
    pub fn start(&mut self) {
        if self.phase != Phase::Intro {
            return;
        }
        if self.questions.is_empty() {
            self.phase = Phase::Completed;
        } else {
            self.enter_question(0);
        }
    }

    fn enter_question(&mut self, index: usize) {
        self.cursor = index;
        self.highlighted = 0;
        self.answer = None;
        self.remaining = QUESTION_TIME_SECS;
        self.phase = Phase::Question;
    }

    /// One second of countdown. Reaching zero with no locked answer shows
    /// the result with nothing selected, which counts as incorrect.
    pub fn tick(&mut self) {
        if self.phase != Phase::Question || self.answer.is_some() {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.phase = Phase::Result;
        }
    }

    pub fn highlight_next(&mut self) {
        if self.phase == Phase::Question {
            self.highlighted = (self.highlighted + 1) % NUM_OPTIONS;
        }
    }

    pub fn highlight_previous(&mut self) {
        if self.phase == Phase::Question {
            self.highlighted = (self.highlighted + NUM_OPTIONS - 1) % NUM_OPTIONS;
        }
    }

    /// Locks the highlighted option as the answer: stops the countdown,
    /// scores it, and shows the result. Ignored outside the question
    /// phase, so a question can be answered at most once.
    pub fn choose(&mut self) {
        if self.phase != Phase::Question {
            return;
        }
        let question = &self.questions[self.cursor];
        self.answer = Some(self.highlighted);
        if question.options[self.highlighted] == question.correct_answer {
            self.score += 1;
        }
        self.phase = Phase::Result;
    }

    /// From a result, opens the next question with a fresh timer, or the
    /// completion screen after the last one.
    pub fn advance(&mut self) {
        if self.phase != Phase::Result {
            return;
        }
        if self.cursor + 1 < self.questions.len() {
            self.enter_question(self.cursor + 1);
        } else {
            self.phase = Phase::Completed;
        }
    }

    /// From the completion screen, begins a new attempt at question 0
    /// with the score reset.
    pub fn restart(&mut self) {
        if self.phase != Phase::Completed {
            return;
        }
        self.score = 0;
        if !self.questions.is_empty() {
            self.enter_question(0);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    pub fn current_question_number(&self) -> usize {
        self.cursor + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// The locked answer for the current question, if any.
    pub fn answer(&self) -> Option<usize> {
        self.answer
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn is_last_question(&self) -> bool {
        self.cursor + 1 >= self.questions.len()
    }

    /// Final percentage, rounded to the nearest whole number.
    pub fn percentage(&self) -> u32 {
        if self.questions.is_empty() {
            0
        } else {
            let ratio = self.score as f64 / self.questions.len() as f64;
            (ratio * 100.0).round() as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_questions;

    fn started_session() -> QuizSession {
        let mut session = QuizSession::new(seed_questions());
        session.start();
        session
    }

    /// Moves the highlight onto the given option text and locks it in.
    fn answer_with(session: &mut QuizSession, text: &str) {
        let index = session
            .current_question()
            .unwrap()
            .options
            .iter()
            .position(|o| o == text)
            .unwrap();
        for _ in 0..index {
            session.highlight_next();
        }
        session.choose();
    }

    /// Locks in a wrong option for the current question.
    fn answer_wrong(session: &mut QuizSession) {
        let question = session.current_question().unwrap().clone();
        let wrong = question
            .options
            .iter()
            .find(|o| **o != question.correct_answer)
            .unwrap()
            .clone();
        answer_with(session, &wrong);
    }

    #[test]
    fn all_correct_scores_full_marks() {
        let mut session = started_session();
        for _ in 0..5 {
            let correct = session.current_question().unwrap().correct_answer.clone();
            answer_with(&mut session, &correct);
            assert_eq!(session.phase(), Phase::Result);
            session.advance();
        }
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.score(), 5);
        assert_eq!(session.percentage(), 100);
    }

    #[test]
    fn all_timeouts_score_zero() {
        let mut session = started_session();
        for _ in 0..5 {
            for _ in 0..QUESTION_TIME_SECS {
                session.tick();
            }
            assert_eq!(session.phase(), Phase::Result);
            assert_eq!(session.answer(), None);
            session.advance();
        }
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn timeout_fires_exactly_at_zero() {
        let mut session = started_session();
        for expected in (1..QUESTION_TIME_SECS).rev() {
            session.tick();
            assert_eq!(session.phase(), Phase::Question);
            assert_eq!(session.remaining_secs(), expected);
        }
        session.tick();
        assert_eq!(session.remaining_secs(), 0);
        assert_eq!(session.phase(), Phase::Result);
        assert_eq!(session.answer(), None);
    }

    #[test]
    fn first_correct_rest_wrong_scores_one_fifth() {
        let mut session = started_session();
        assert_eq!(
            session.current_question().unwrap().question,
            "日本で「鎌倉幕府」が開かれたのは何年？"
        );
        answer_with(&mut session, "1192年");
        assert_eq!(session.score(), 1);
        session.advance();
        for _ in 0..4 {
            answer_wrong(&mut session);
            session.advance();
        }
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.score(), 1);
        assert_eq!(session.percentage(), 20);
    }

    #[test]
    fn question_answered_at_most_once() {
        let mut session = started_session();
        let correct = session.current_question().unwrap().correct_answer.clone();
        answer_with(&mut session, &correct);
        assert_eq!(session.score(), 1);
        // Further selections while the result is showing are ignored.
        session.choose();
        session.choose();
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::Result);
    }

    #[test]
    fn countdown_stops_once_answered() {
        let mut session = started_session();
        session.choose();
        let remaining = session.remaining_secs();
        session.tick();
        assert_eq!(session.remaining_secs(), remaining);
        assert_eq!(session.phase(), Phase::Result);
    }

    #[test]
    fn advance_resets_timer_and_selection() {
        let mut session = started_session();
        session.tick();
        session.choose();
        session.advance();
        assert_eq!(session.phase(), Phase::Question);
        assert_eq!(session.remaining_secs(), QUESTION_TIME_SECS);
        assert_eq!(session.answer(), None);
        assert_eq!(session.current_question_number(), 2);
    }

    #[test]
    fn restart_returns_to_first_question() {
        let mut session = started_session();
        for _ in 0..5 {
            session.choose();
            session.advance();
        }
        assert_eq!(session.phase(), Phase::Completed);
        session.restart();
        assert_eq!(session.phase(), Phase::Question);
        assert_eq!(session.current_question_number(), 1);
        assert_eq!(session.score(), 0);
        assert_eq!(session.remaining_secs(), QUESTION_TIME_SECS);
    }

    #[test]
    fn empty_question_set_completes_immediately() {
        let mut session = QuizSession::new(Vec::new());
        session.start();
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.score(), 0);
        assert_eq!(session.percentage(), 0);
        // Restart has nowhere to go and stays on the completion screen.
        session.restart();
        assert_eq!(session.phase(), Phase::Completed);
    }
}
