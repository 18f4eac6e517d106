//! Orchestrates a practice session against the store: selection, answer
//! bookkeeping, and final grading with statistics persistence.

use std::sync::Arc;

use quiz_core::Clock;
use storage::QuizStore;

use crate::error::SessionError;
use crate::sessions::plan::{select_questions, QuestionCount, Selection, Shortfall};
use crate::sessions::quiz::{AnswerCheck, PracticeMode, QuizReport, QuizSession};
use crate::stats::StatsService;

/// Settings for one practice run.
#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub mode: PracticeMode,
    pub count: QuestionCount,
    pub shuffle_questions: bool,
    pub shuffle_answers: bool,
    pub subject: Option<String>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            mode: PracticeMode::CheckAsYouGo,
            count: QuestionCount::All,
            shuffle_questions: true,
            shuffle_answers: false,
            subject: None,
        }
    }
}

/// A freshly started session, with the selection notice if any.
#[derive(Debug)]
pub struct StartedQuiz {
    pub session: QuizSession,
    pub shortfall: Option<Shortfall>,
}

/// Runs practice sessions and feeds their outcomes into the statistics.
#[derive(Clone)]
pub struct PracticeService {
    store: Arc<dyn QuizStore>,
    stats: StatsService,
    clock: Clock,
}

impl PracticeService {
    #[must_use]
    pub fn new(store: Arc<dyn QuizStore>, stats: StatsService, clock: Clock) -> Self {
        Self { store, stats, clock }
    }

    /// Selects questions per the config and starts a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestionsAvailable` when the bank (after the
    /// subject filter) is empty.
    pub fn start(&self, config: &QuizConfig) -> Result<StartedQuiz, SessionError> {
        let bank = self.store.load_questions();
        let mut rng = rand::rng();

        let Selection {
            questions,
            shortfall,
        } = select_questions(
            bank,
            config.subject.as_deref(),
            config.count,
            config.shuffle_questions,
            &mut rng,
        )?;

        if let Some(notice) = shortfall {
            log::info!(
                "requested {} questions but only {} available",
                notice.requested,
                notice.available
            );
        }

        let session = QuizSession::new(
            questions,
            config.mode,
            config.shuffle_answers,
            &mut rng,
            self.clock.now(),
        )?;

        Ok(StartedQuiz { session, shortfall })
    }

    /// Submits an answer for the session's current question.
    ///
    /// In check-as-you-go mode the verdict is recorded in the statistics
    /// immediately; end-of-quiz answers are attributed at grading time.
    ///
    /// # Errors
    ///
    /// Propagates session errors, plus `SessionError::Stats` if the
    /// statistics update cannot be saved.
    pub fn answer(
        &self,
        session: &mut QuizSession,
        choice: usize,
    ) -> Result<Option<AnswerCheck>, SessionError> {
        let check = session.submit_answer(choice)?;
        if let Some(check) = check {
            self.stats.record_answer(check.is_correct)?;
        }
        Ok(check)
    }

    /// Grades the session and persists its outcome.
    ///
    /// End-of-quiz sessions attribute every question (unanswered counts as
    /// incorrect) to the running counters here; check-as-you-go sessions
    /// already did that per answer. Both record one history entry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyGraded` on a second call and
    /// `SessionError::Stats` if persistence fails.
    pub fn finish(&self, session: &mut QuizSession) -> Result<QuizReport, SessionError> {
        let report = session.grade(self.clock.now())?;

        if session.mode() == PracticeMode::EndOfQuiz {
            for correct in session.outcomes() {
                self.stats.record_answer(correct)?;
            }
        }
        self.stats
            .record_session(report.correct, report.total, report.time_spent_secs)?;

        Ok(report)
    }
}
