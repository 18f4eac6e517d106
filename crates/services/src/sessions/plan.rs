//! Question selection for a practice session: subject filter, optional
//! shuffle, then a count cap.

use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::Question;

use crate::error::SessionError;

/// How many questions to draw from the filtered bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCount {
    /// Every available question.
    All,
    /// At most this many questions.
    Limit(usize),
}

/// Informational notice: fewer questions were available than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub requested: usize,
    pub available: usize,
}

/// Outcome of question selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub questions: Vec<Question>,
    /// Present when a numeric count exceeded availability; the session still
    /// proceeds with everything available.
    pub shortfall: Option<Shortfall>,
}

/// Selects the questions for a session.
///
/// Filters by subject when given, shuffles with Fisher–Yates when requested,
/// then takes the first `min(count, available)`.
///
/// # Errors
///
/// Returns `SessionError::NoQuestionsAvailable` when the filter leaves
/// nothing to practice.
pub fn select_questions(
    bank: Vec<Question>,
    subject: Option<&str>,
    count: QuestionCount,
    shuffle: bool,
    rng: &mut impl Rng,
) -> Result<Selection, SessionError> {
    let mut selected: Vec<Question> = match subject {
        Some(subject) => bank.into_iter().filter(|q| q.subject() == subject).collect(),
        None => bank,
    };

    if selected.is_empty() {
        return Err(SessionError::NoQuestionsAvailable);
    }

    if shuffle {
        selected.as_mut_slice().shuffle(rng);
    }

    let available = selected.len();
    let shortfall = match count {
        QuestionCount::All => None,
        QuestionCount::Limit(requested) => {
            selected.truncate(requested.min(available));
            (requested > available).then_some(Shortfall {
                requested,
                available,
            })
        }
    };

    Ok(Selection {
        questions: selected,
        shortfall,
    })
}
