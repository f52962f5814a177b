//! Timed quiz session state machine.
//!
//! ```text
//! SelectingSubject -> InProgress -> Submitted
//! ```
//!
//! The session has no internal thread: the owner calls `tick()` once per
//! second while the quiz is in progress. When the countdown reaches zero,
//! `tick()` submits synchronously. `submit()` is idempotent so a manual
//! click racing the timeout still produces exactly one scored outcome per
//! session instance. Abandoning the session (drop or `reset()`) persists
//! nothing.

use std::collections::HashMap;

use crate::domain::QuizQuestion;
use crate::engine::{self, QuizOutcome};
use crate::error::EngineError;

/// Number of questions served per quiz (head of the subject's bank).
pub const QUESTIONS_PER_QUIZ: usize = 10;

/// Countdown budget for one quiz, in seconds.
pub const TIME_LIMIT_SECS: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    SelectingSubject,
    InProgress,
    Submitted,
}

/// One quiz attempt. Owns its question subset, answers and countdown for
/// its whole lifetime; nothing is shared across sessions.
#[derive(Debug, Clone)]
pub struct TimedQuizSession {
    phase: QuizPhase,
    subject: String,
    questions: Vec<QuizQuestion>,
    answers: HashMap<usize, String>,
    remaining_seconds: u32,
    started_at_epoch_ms: Option<u64>,
    outcome: Option<QuizOutcome>,
}

impl TimedQuizSession {
    pub fn new() -> Self {
        Self {
            phase: QuizPhase::SelectingSubject,
            subject: String::new(),
            questions: Vec::new(),
            answers: HashMap::new(),
            remaining_seconds: 0,
            started_at_epoch_ms: None,
            outcome: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    #[allow(dead_code)]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == QuizPhase::InProgress
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn started_at_epoch_ms(&self) -> Option<u64> {
        self.started_at_epoch_ms
    }

    /// Result snapshot, present once the session is `Submitted`.
    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load the first questions of the subject's bank and start the
    /// countdown. Valid only from `SelectingSubject`.
    pub fn select_subject(
        &mut self,
        subject: &str,
        bank: &[QuizQuestion],
    ) -> Result<(), EngineError> {
        if self.phase != QuizPhase::SelectingSubject {
            return Err(EngineError::InvalidInput(
                "a quiz is already in progress; reset first".into(),
            ));
        }
        if bank.is_empty() {
            return Err(EngineError::EmptyBank(subject.to_string()));
        }
        self.subject = subject.to_string();
        self.questions = bank.iter().take(QUESTIONS_PER_QUIZ).cloned().collect();
        self.answers.clear();
        self.remaining_seconds = TIME_LIMIT_SECS;
        self.started_at_epoch_ms = Some(now_ms());
        self.outcome = None;
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// Record (or overwrite) the answer for a question index. Permissive:
    /// the option is not validated against the question's option list, and
    /// out-of-range indices simply never match at grading time. Returns
    /// false when the session is not in progress.
    pub fn record_answer(&mut self, question_index: usize, option: &str) -> bool {
        if self.phase != QuizPhase::InProgress {
            return false;
        }
        self.answers.insert(question_index, option.to_string());
        true
    }

    /// One second of wall clock. Decrements to a floor of zero and submits
    /// synchronously when the countdown expires. No-op outside
    /// `InProgress`, including after `Submitted`.
    pub fn tick(&mut self) -> Option<QuizOutcome> {
        if self.phase != QuizPhase::InProgress {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return self.submit();
        }
        None
    }

    /// Grade and finish the quiz. Idempotent: the first call (manual or
    /// timeout-triggered) returns the outcome, any later call is a no-op.
    pub fn submit(&mut self) -> Option<QuizOutcome> {
        if self.phase != QuizPhase::InProgress {
            return None;
        }
        let outcome = match engine::grade_quiz(&self.subject, &self.questions, &self.answers) {
            Ok(outcome) => outcome,
            // select_subject rejects empty banks, so grading cannot fail on
            // a session that went through the normal transitions.
            Err(e) => {
                tracing::error!(target: "assessment", subject = %self.subject, error = %e, "grading failed");
                return None;
            }
        };
        self.outcome = Some(outcome.clone());
        self.phase = QuizPhase::Submitted;
        Some(outcome)
    }

    /// Throw the attempt away and go back to subject selection. Used both
    /// for "take another quiz" and for abandoning mid-quiz.
    pub fn reset(&mut self) {
        *self = TimedQuizSession::new();
    }
}

impl Default for TimedQuizSession {
    fn default() -> Self {
        Self::new()
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                prompt: format!("question {i}"),
                options: vec!["a".into(), "b".into()],
                answer: "a".into(),
                topic: "Fundamentals".into(),
            })
            .collect()
    }

    #[test]
    fn select_answer_submit() {
        let mut session = TimedQuizSession::new();
        assert_eq!(session.phase(), QuizPhase::SelectingSubject);

        session.select_subject("Mathematics", &bank(10)).expect("select");
        assert_eq!(session.phase(), QuizPhase::InProgress);
        assert_eq!(session.remaining_seconds(), TIME_LIMIT_SECS);

        assert!(session.record_answer(0, "a"));
        assert!(session.record_answer(1, "b"));
        let outcome = session.submit().expect("outcome");
        assert_eq!(session.phase(), QuizPhase::Submitted);
        assert_eq!(outcome.correct_count, 1);
        assert_eq!(outcome.total_count, 10);
    }

    #[test]
    fn empty_bank_is_a_configuration_error() {
        let mut session = TimedQuizSession::new();
        assert_eq!(
            session.select_subject("Mathematics", &[]),
            Err(EngineError::EmptyBank("Mathematics".into()))
        );
        assert_eq!(session.phase(), QuizPhase::SelectingSubject);
    }

    #[test]
    fn bank_is_truncated_to_quiz_length() {
        let mut session = TimedQuizSession::new();
        session.select_subject("Mathematics", &bank(25)).expect("select");
        assert_eq!(session.questions().len(), QUESTIONS_PER_QUIZ);
    }

    #[test]
    fn re_answering_overwrites() {
        let mut session = TimedQuizSession::new();
        session.select_subject("Mathematics", &bank(10)).expect("select");
        session.record_answer(3, "b");
        session.record_answer(3, "a");
        assert_eq!(session.answered_count(), 1);
        let outcome = session.submit().expect("outcome");
        assert_eq!(outcome.correct_count, 1);
    }

    #[test]
    fn submit_is_idempotent() {
        let mut session = TimedQuizSession::new();
        session.select_subject("Mathematics", &bank(10)).expect("select");
        session.record_answer(0, "a");

        let first = session.submit().expect("first submit");
        assert!(session.submit().is_none());
        // The snapshot survives and matches the emitted outcome.
        assert_eq!(session.outcome().expect("snapshot").score, first.score);
    }

    #[test]
    fn countdown_auto_submits_exactly_once() {
        let mut session = TimedQuizSession::new();
        session.select_subject("Mathematics", &bank(10)).expect("select");

        let mut emitted = 0;
        for _ in 0..TIME_LIMIT_SECS {
            if session.tick().is_some() {
                emitted += 1;
            }
        }
        assert_eq!(emitted, 1);
        assert_eq!(session.phase(), QuizPhase::Submitted);
        assert_eq!(session.remaining_seconds(), 0);
        assert!(session.tick().is_none());
    }

    #[test]
    fn manual_submit_wins_the_race_with_the_timer() {
        let mut session = TimedQuizSession::new();
        session.select_subject("Mathematics", &bank(10)).expect("select");
        session.record_answer(0, "a");

        assert!(session.submit().is_some());
        // A stale timer callback arriving after submission is a no-op.
        assert!(session.tick().is_none());
        assert_eq!(session.outcome().expect("snapshot").correct_count, 1);
    }

    #[test]
    fn recording_outside_in_progress_is_rejected() {
        let mut session = TimedQuizSession::new();
        assert!(!session.record_answer(0, "a"));
        session.select_subject("Mathematics", &bank(10)).expect("select");
        session.submit();
        assert!(!session.record_answer(0, "a"));
    }

    #[test]
    fn reset_returns_to_subject_selection() {
        let mut session = TimedQuizSession::new();
        session.select_subject("Mathematics", &bank(10)).expect("select");
        session.record_answer(0, "a");
        session.submit();

        session.reset();
        assert_eq!(session.phase(), QuizPhase::SelectingSubject);
        assert_eq!(session.answered_count(), 0);
        assert!(session.outcome().is_none());
        session.select_subject("FLA", &bank(10)).expect("select again");
        assert_eq!(session.subject(), "FLA");
    }

    #[test]
    fn selecting_twice_without_reset_is_rejected() {
        let mut session = TimedQuizSession::new();
        session.select_subject("Mathematics", &bank(10)).expect("select");
        assert!(session.select_subject("FLA", &bank(10)).is_err());
        assert_eq!(session.subject(), "Mathematics");
    }
}
