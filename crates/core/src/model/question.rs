use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least 2 answers, got {len}")]
    TooFewAnswers { len: usize },

    #[error("correct answer index {index} is out of range for {len} answers")]
    CorrectAnswerOutOfRange { index: usize, len: usize },

    #[error("answer flags do not match correct answer index {index}")]
    CorrectFlagMismatch { index: usize },
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// One answer option of a multiple-choice question.
///
/// Answers are owned by their question and have no independent lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    text: String,
    is_correct: bool,
}

impl Answer {
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly one correct answer.
///
/// Invariant: at least two answers, `correct_answer` in range, and exactly one
/// answer flagged correct, at position `correct_answer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    answers: Vec<Answer>,
    correct_answer: usize,
    subject: String,
    difficulty: String,
}

impl Question {
    /// Creates a new question from answer texts and the correct index.
    ///
    /// Answer flags are derived from `correct_answer`, so the one-correct
    /// invariant holds by construction.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is empty, fewer than two answers
    /// are given, or `correct_answer` is out of range.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        answer_texts: Vec<String>,
        correct_answer: usize,
        subject: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if answer_texts.len() < 2 {
            return Err(QuestionError::TooFewAnswers {
                len: answer_texts.len(),
            });
        }
        if correct_answer >= answer_texts.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: answer_texts.len(),
            });
        }

        let answers = answer_texts
            .into_iter()
            .enumerate()
            .map(|(i, t)| Answer::new(t, i == correct_answer))
            .collect();

        Ok(Self {
            id,
            text: text.trim().to_owned(),
            answers,
            correct_answer,
            subject: subject.into(),
            difficulty: difficulty.into(),
        })
    }

    /// Rehydrate a question from persisted storage, keeping stored flags.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored record violates the question
    /// invariant. Records that fail here are exactly what the offline backup
    /// repair tool rewrites.
    pub fn from_persisted(
        id: QuestionId,
        text: impl Into<String>,
        answers: Vec<Answer>,
        correct_answer: usize,
        subject: impl Into<String>,
        difficulty: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if answers.len() < 2 {
            return Err(QuestionError::TooFewAnswers { len: answers.len() });
        }
        if correct_answer >= answers.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: answers.len(),
            });
        }

        let flagged: Vec<usize> = answers
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.is_correct().then_some(i))
            .collect();
        if flagged != [correct_answer] {
            return Err(QuestionError::CorrectFlagMismatch {
                index: correct_answer,
            });
        }

        Ok(Self {
            id,
            text,
            answers,
            correct_answer,
            subject: subject.into(),
            difficulty: difficulty.into(),
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> &str {
        &self.difficulty
    }

    /// Returns true if the chosen answer index is the correct one.
    #[must_use]
    pub fn is_correct_choice(&self, choice: usize) -> bool {
        choice == self.correct_answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn new_flags_exactly_one_answer() {
        let q = Question::new(QuestionId::new(1), "2 + 2 = ?", texts(4), 2, "Math", "Medium")
            .unwrap();

        let flagged: Vec<usize> = q
            .answers()
            .iter()
            .enumerate()
            .filter_map(|(i, a)| a.is_correct().then_some(i))
            .collect();
        assert_eq!(flagged, vec![2]);
        assert!(q.is_correct_choice(2));
        assert!(!q.is_correct_choice(0));
    }

    #[test]
    fn new_rejects_empty_text() {
        let err =
            Question::new(QuestionId::new(1), "   ", texts(4), 0, "Math", "Medium").unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn new_rejects_too_few_answers() {
        let err =
            Question::new(QuestionId::new(1), "Q", texts(1), 0, "Math", "Medium").unwrap_err();
        assert_eq!(err, QuestionError::TooFewAnswers { len: 1 });
    }

    #[test]
    fn new_rejects_out_of_range_index() {
        let err =
            Question::new(QuestionId::new(1), "Q", texts(3), 3, "Math", "Medium").unwrap_err();
        assert_eq!(err, QuestionError::CorrectAnswerOutOfRange { index: 3, len: 3 });
    }

    #[test]
    fn from_persisted_rejects_mismatched_flags() {
        let answers = vec![
            Answer::new("a", true),
            Answer::new("b", false),
            Answer::new("c", false),
        ];
        let err = Question::from_persisted(QuestionId::new(1), "Q", answers, 2, "Math", "Medium")
            .unwrap_err();
        assert_eq!(err, QuestionError::CorrectFlagMismatch { index: 2 });
    }

    #[test]
    fn from_persisted_rejects_multiple_flags() {
        let answers = vec![Answer::new("a", true), Answer::new("b", true)];
        let err = Question::from_persisted(QuestionId::new(1), "Q", answers, 0, "Math", "Medium")
            .unwrap_err();
        assert_eq!(err, QuestionError::CorrectFlagMismatch { index: 0 });
    }

    #[test]
    fn from_persisted_round_trips_new() {
        let q = Question::new(QuestionId::new(9), "Q", texts(4), 1, "History", "Medium").unwrap();
        let again = Question::from_persisted(
            q.id(),
            q.text(),
            q.answers().to_vec(),
            q.correct_answer(),
            q.subject(),
            q.difficulty(),
        )
        .unwrap();
        assert_eq!(q, again);
    }
}
