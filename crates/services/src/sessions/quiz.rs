//! In-memory state machine for one practice run.
//!
//! The session owns its questions, tracks the cursor and the recorded
//! answers, and produces a report exactly once when graded.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;

use crate::error::SessionError;

/// When answers are checked during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PracticeMode {
    /// Each submitted answer is checked and locked immediately.
    #[default]
    CheckAsYouGo,
    /// Answers stay editable until the whole session is graded.
    EndOfQuiz,
}

/// Immediate feedback for a checked answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerCheck {
    pub is_correct: bool,
    /// Index of the correct answer, for revealing it after a miss.
    pub correct_answer: usize,
}

/// Outcome of advancing the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Already on the last question.
    End,
}

/// Final result of a graded session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizReport {
    pub correct: u32,
    pub total: u32,
    /// Whole-number percentage, rounded half up.
    pub accuracy: u8,
    pub time_spent_secs: u64,
}

impl QuizReport {
    /// Score as a `correct/total` fraction, e.g. `2/3`.
    #[must_use]
    pub fn score(&self) -> String {
        format!("{}/{}", self.correct, self.total)
    }
}

/// One line of the post-grading review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewEntry<'a> {
    pub question: &'a Question,
    /// The answer the user picked, if any.
    pub chosen: Option<usize>,
    pub is_correct: bool,
}

/// A single practice run over a fixed set of questions.
///
/// The session never touches storage; persisting outcomes is the runner's
/// job.
pub struct QuizSession {
    questions: Vec<Question>,
    mode: PracticeMode,
    current: usize,
    answers: Vec<Option<usize>>,
    locked: Vec<bool>,
    display_orders: Vec<Vec<usize>>,
    started_at: DateTime<Utc>,
    report: Option<QuizReport>,
}

impl QuizSession {
    /// Starts a session over the given questions.
    ///
    /// When `shuffle_answers` is set, each question gets a random display
    /// order for its options; answer indices elsewhere in the API always
    /// refer to the question's own order.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestionsAvailable` for an empty question
    /// list.
    pub fn new(
        questions: Vec<Question>,
        mode: PracticeMode,
        shuffle_answers: bool,
        rng: &mut impl Rng,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestionsAvailable);
        }

        let len = questions.len();
        let display_orders = questions
            .iter()
            .map(|q| {
                let mut order: Vec<usize> = (0..q.answers().len()).collect();
                if shuffle_answers {
                    order.as_mut_slice().shuffle(rng);
                }
                order
            })
            .collect();

        Ok(Self {
            questions,
            mode,
            current: 0,
            answers: vec![None; len],
            locked: vec![false; len],
            display_orders,
            started_at,
            report: None,
        })
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Zero-based cursor position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    /// Display order for the current question's answers.
    #[must_use]
    pub fn display_order(&self) -> &[usize] {
        &self.display_orders[self.current]
    }

    /// The answer recorded for the current question, if any.
    #[must_use]
    pub fn answer_at_cursor(&self) -> Option<usize> {
        self.answers[self.current]
    }

    /// Whether the current question's answer is locked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked[self.current]
    }

    /// Number of questions answered so far.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Records an answer for the current question.
    ///
    /// In check-as-you-go mode the answer is checked and locked immediately
    /// and the verdict is returned. In end-of-quiz mode the answer stays
    /// editable and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidChoice` for an out-of-range index,
    /// `SessionError::AnswerLocked` when resubmitting a checked answer, and
    /// `SessionError::AlreadyGraded` after grading.
    pub fn submit_answer(&mut self, choice: usize) -> Result<Option<AnswerCheck>, SessionError> {
        if self.report.is_some() {
            return Err(SessionError::AlreadyGraded);
        }
        let question = &self.questions[self.current];
        if choice >= question.answers().len() {
            return Err(SessionError::InvalidChoice { index: choice });
        }
        if self.locked[self.current] {
            return Err(SessionError::AnswerLocked);
        }

        self.answers[self.current] = Some(choice);
        match self.mode {
            PracticeMode::CheckAsYouGo => {
                self.locked[self.current] = true;
                Ok(Some(AnswerCheck {
                    is_correct: question.is_correct_choice(choice),
                    correct_answer: question.correct_answer(),
                }))
            }
            PracticeMode::EndOfQuiz => Ok(None),
        }
    }

    /// Moves the cursor to the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyGraded` after grading.
    pub fn advance(&mut self) -> Result<Step, SessionError> {
        if self.report.is_some() {
            return Err(SessionError::AlreadyGraded);
        }
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(Step::Moved)
        } else {
            Ok(Step::End)
        }
    }

    /// Moves the cursor to the previous question. Returns false when already
    /// on the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyGraded` after grading.
    pub fn retreat(&mut self) -> Result<bool, SessionError> {
        if self.report.is_some() {
            return Err(SessionError::AlreadyGraded);
        }
        if self.current > 0 {
            self.current -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Grades the session, counting unanswered questions as incorrect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyGraded` on a second call.
    pub fn grade(&mut self, now: DateTime<Utc>) -> Result<QuizReport, SessionError> {
        if self.report.is_some() {
            return Err(SessionError::AlreadyGraded);
        }

        let correct = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.is_some_and(|choice| q.is_correct_choice(choice)))
            .count() as u32;
        let total = self.questions.len() as u32;
        let accuracy = quiz_core::model::accuracy_percent(correct, total);
        let elapsed = now.signed_duration_since(self.started_at);
        let time_spent_secs = elapsed.num_seconds().max(0) as u64;

        let report = QuizReport {
            correct,
            total,
            accuracy,
            time_spent_secs,
        };
        self.report = Some(report);
        Ok(report)
    }

    #[must_use]
    pub fn is_graded(&self) -> bool {
        self.report.is_some()
    }

    #[must_use]
    pub fn report(&self) -> Option<QuizReport> {
        self.report
    }

    /// Per-question breakdown of a graded session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotGraded` before grading.
    pub fn review(&self) -> Result<Vec<ReviewEntry<'_>>, SessionError> {
        if self.report.is_none() {
            return Err(SessionError::NotGraded);
        }
        Ok(self
            .questions
            .iter()
            .zip(&self.answers)
            .map(|(question, chosen)| ReviewEntry {
                question,
                chosen: *chosen,
                is_correct: chosen.is_some_and(|c| question.is_correct_choice(c)),
            })
            .collect())
    }

    /// Pairs of answered choices and their questions, in session order.
    /// Used by the runner to attribute end-of-quiz answers to the stats.
    #[must_use]
    pub fn outcomes(&self) -> Vec<bool> {
        self.questions
            .iter()
            .zip(&self.answers)
            .map(|(q, a)| a.is_some_and(|choice| q.is_correct_choice(choice)))
            .collect()
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered())
            .field("graded", &self.report.is_some())
            .finish()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::QuestionId;
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_question(id: u64, correct: usize) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}?"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            "Math",
            "Medium",
        )
        .unwrap()
    }

    fn session(mode: PracticeMode) -> QuizSession {
        let questions = vec![
            build_question(1, 0),
            build_question(2, 1),
            build_question(3, 2),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        QuizSession::new(questions, mode, false, &mut rng, fixed_now()).unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = QuizSession::new(
            Vec::new(),
            PracticeMode::CheckAsYouGo,
            false,
            &mut rng,
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::NoQuestionsAvailable));
    }

    #[test]
    fn check_mode_locks_after_first_submission() {
        let mut session = session(PracticeMode::CheckAsYouGo);

        let check = session.submit_answer(0).unwrap().unwrap();
        assert!(check.is_correct);
        assert_eq!(check.correct_answer, 0);
        assert!(session.is_locked());

        let err = session.submit_answer(1).unwrap_err();
        assert!(matches!(err, SessionError::AnswerLocked));
        assert_eq!(session.answer_at_cursor(), Some(0));
    }

    #[test]
    fn check_mode_reveals_correct_answer_on_miss() {
        let mut session = session(PracticeMode::CheckAsYouGo);
        let check = session.submit_answer(3).unwrap().unwrap();
        assert!(!check.is_correct);
        assert_eq!(check.correct_answer, 0);
    }

    #[test]
    fn end_mode_allows_changing_answers() {
        let mut session = session(PracticeMode::EndOfQuiz);

        assert!(session.submit_answer(3).unwrap().is_none());
        assert!(!session.is_locked());
        assert!(session.submit_answer(0).unwrap().is_none());
        assert_eq!(session.answer_at_cursor(), Some(0));
    }

    #[test]
    fn out_of_range_choice_is_rejected() {
        let mut session = session(PracticeMode::EndOfQuiz);
        let err = session.submit_answer(4).unwrap_err();
        assert!(matches!(err, SessionError::InvalidChoice { index: 4 }));
        assert_eq!(session.answer_at_cursor(), None);
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let mut session = session(PracticeMode::EndOfQuiz);

        assert!(!session.retreat().unwrap());
        assert_eq!(session.advance().unwrap(), Step::Moved);
        assert_eq!(session.advance().unwrap(), Step::Moved);
        assert_eq!(session.position(), 2);
        assert_eq!(session.advance().unwrap(), Step::End);
        assert!(session.retreat().unwrap());
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn grading_counts_unanswered_as_incorrect() {
        let mut session = session(PracticeMode::EndOfQuiz);
        session.submit_answer(0).unwrap();
        session.advance().unwrap();
        session.submit_answer(3).unwrap();
        // third question left unanswered

        let report = session.grade(fixed_now() + Duration::seconds(95)).unwrap();
        assert_eq!(report.correct, 1);
        assert_eq!(report.total, 3);
        assert_eq!(report.accuracy, 33);
        assert_eq!(report.time_spent_secs, 95);
        assert_eq!(report.score(), "1/3");
    }

    #[test]
    fn grading_twice_fails() {
        let mut session = session(PracticeMode::CheckAsYouGo);
        session.grade(fixed_now()).unwrap();
        assert!(matches!(
            session.grade(fixed_now()).unwrap_err(),
            SessionError::AlreadyGraded
        ));
    }

    #[test]
    fn graded_session_rejects_further_input() {
        let mut session = session(PracticeMode::EndOfQuiz);
        session.grade(fixed_now()).unwrap();

        assert!(matches!(
            session.submit_answer(0).unwrap_err(),
            SessionError::AlreadyGraded
        ));
        assert!(matches!(
            session.advance().unwrap_err(),
            SessionError::AlreadyGraded
        ));
    }

    #[test]
    fn review_requires_grading() {
        let mut session = session(PracticeMode::EndOfQuiz);
        assert!(matches!(session.review().unwrap_err(), SessionError::NotGraded));

        session.submit_answer(0).unwrap();
        session.grade(fixed_now()).unwrap();

        let review = session.review().unwrap();
        assert_eq!(review.len(), 3);
        assert!(review[0].is_correct);
        assert_eq!(review[0].chosen, Some(0));
        assert!(!review[1].is_correct);
        assert_eq!(review[1].chosen, None);
    }

    #[test]
    fn shuffled_display_order_is_a_permutation() {
        let questions = vec![build_question(1, 0)];
        let mut rng = StdRng::seed_from_u64(7);
        let session = QuizSession::new(
            questions,
            PracticeMode::CheckAsYouGo,
            true,
            &mut rng,
            fixed_now(),
        )
        .unwrap();

        let mut order = session.display_order().to_vec();
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }
}
