//! Question bank and subject management.
//!
//! Stateless over the store: every operation loads the collection, applies
//! the change, and saves it back wholesale.

use std::sync::Arc;

use quiz_core::model::Question;
use quiz_core::{Clock, QuestionParser};
use storage::QuizStore;

use crate::error::BankError;

/// Result of parsing and saving a batch of freeform text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    /// Questions appended to the bank.
    pub saved: usize,
    /// Malformed blocks that were skipped.
    pub skipped: usize,
}

/// Manages the question bank and the subject list.
#[derive(Clone)]
pub struct BankService {
    store: Arc<dyn QuizStore>,
    clock: Clock,
    parser: QuestionParser,
}

impl BankService {
    #[must_use]
    pub fn new(store: Arc<dyn QuizStore>, clock: Clock) -> Self {
        Self {
            store,
            clock,
            parser: QuestionParser::new(),
        }
    }

    /// Replaces the parser, e.g. to change the fallback correct choice.
    #[must_use]
    pub fn with_parser(mut self, parser: QuestionParser) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub fn questions(&self) -> Vec<Question> {
        self.store.load_questions()
    }

    #[must_use]
    pub fn subjects(&self) -> Vec<String> {
        self.store.load_subjects()
    }

    /// Question count per subject, in subject-list order.
    #[must_use]
    pub fn subject_counts(&self) -> Vec<(String, usize)> {
        let questions = self.store.load_questions();
        self.store
            .load_subjects()
            .into_iter()
            .map(|subject| {
                let count = questions.iter().filter(|q| q.subject() == subject).count();
                (subject, count)
            })
            .collect()
    }

    /// Parses freeform text and appends every accepted question to the bank.
    ///
    /// An unknown subject is registered in the subject list as a side effect,
    /// so cascading deletion stays coherent.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyInput` for blank input,
    /// `BankError::NoQuestionsParsed` when nothing valid was found, and
    /// `BankError::Storage` on save failure.
    pub fn add_from_text(&self, input: &str, subject: &str) -> Result<ParseSummary, BankError> {
        if input.trim().is_empty() {
            return Err(BankError::EmptyInput);
        }

        let outcome = self.parser.parse(input, subject, self.clock.now());
        if outcome.questions.is_empty() {
            return Err(BankError::NoQuestionsParsed);
        }

        let saved = outcome.questions.len();
        let mut bank = self.store.load_questions();
        bank.extend(outcome.questions);
        self.store.save_questions(&bank)?;

        self.register_subject(subject)?;

        Ok(ParseSummary {
            saved,
            skipped: outcome.skipped,
        })
    }

    /// Appends a single question to the bank.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Storage` on save failure.
    pub fn add_question(&self, question: Question) -> Result<(), BankError> {
        let subject = question.subject().to_owned();
        let mut bank = self.store.load_questions();
        bank.push(question);
        self.store.save_questions(&bank)?;
        self.register_subject(&subject)
    }

    /// Creates a new subject.
    ///
    /// # Errors
    ///
    /// Returns `BankError::EmptyInput` for a blank name and
    /// `BankError::DuplicateSubject` if it already exists.
    pub fn create_subject(&self, name: &str) -> Result<String, BankError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BankError::EmptyInput);
        }

        let mut subjects = self.store.load_subjects();
        if subjects.iter().any(|s| s == name) {
            return Err(BankError::DuplicateSubject(name.to_owned()));
        }
        subjects.push(name.to_owned());
        self.store.save_subjects(&subjects)?;
        Ok(name.to_owned())
    }

    /// Deletes a subject and every question filed under it.
    ///
    /// Returns the number of questions removed. The cascade is total: after
    /// this call no question in the bank carries the subject.
    ///
    /// # Errors
    ///
    /// Returns `BankError::SubjectNotFound` for an unknown subject and
    /// `BankError::Storage` on save failure.
    pub fn delete_subject(&self, name: &str) -> Result<usize, BankError> {
        let mut subjects = self.store.load_subjects();
        let before = subjects.len();
        subjects.retain(|s| s != name);
        if subjects.len() == before {
            return Err(BankError::SubjectNotFound(name.to_owned()));
        }

        let mut bank = self.store.load_questions();
        let bank_before = bank.len();
        bank.retain(|q| q.subject() != name);
        let removed = bank_before - bank.len();

        self.store.save_subjects(&subjects)?;
        self.store.save_questions(&bank)?;
        Ok(removed)
    }

    fn register_subject(&self, subject: &str) -> Result<(), BankError> {
        let mut subjects = self.store.load_subjects();
        if !subjects.iter().any(|s| s == subject) {
            subjects.push(subject.to_owned());
            self.store.save_subjects(&subjects)?;
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;
    use quiz_core::time::fixed_clock;
    use storage::{InMemoryStore, DEFAULT_SUBJECT};

    fn service() -> (BankService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (BankService::new(store.clone(), fixed_clock()), store)
    }

    fn build_question(id: u64, subject: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}?"),
            vec!["a".into(), "b".into()],
            0,
            subject,
            "Medium",
        )
        .unwrap()
    }

    #[test]
    fn add_from_text_saves_and_counts_skips() {
        let (bank, _) = service();
        let summary = bank
            .add_from_text(
                "Question 1: Fine?\nA. yes\nB. no\nCorrect answer: A\n\
                 Question 2: Broken\nA. lonely\n",
                "Math",
            )
            .unwrap();

        assert_eq!(summary, ParseSummary { saved: 1, skipped: 1 });
        assert_eq!(bank.questions().len(), 1);
        assert!(bank.subjects().contains(&"Math".to_owned()));
    }

    #[test]
    fn add_from_text_rejects_empty_input() {
        let (bank, _) = service();
        assert!(matches!(
            bank.add_from_text("   ", "Math").unwrap_err(),
            BankError::EmptyInput
        ));
    }

    #[test]
    fn add_from_text_rejects_all_malformed_input() {
        let (bank, _) = service();
        assert!(matches!(
            bank.add_from_text("no question markers here", "Math").unwrap_err(),
            BankError::NoQuestionsParsed
        ));
        assert!(bank.questions().is_empty());
    }

    #[test]
    fn create_subject_rejects_duplicates() {
        let (bank, _) = service();
        bank.create_subject("Math").unwrap();
        assert!(matches!(
            bank.create_subject("Math").unwrap_err(),
            BankError::DuplicateSubject(name) if name == "Math"
        ));
    }

    #[test]
    fn delete_subject_cascades_to_questions() {
        let (bank, _) = service();
        bank.create_subject("Math").unwrap();
        bank.create_subject("History").unwrap();
        bank.add_question(build_question(1, "Math")).unwrap();
        bank.add_question(build_question(2, "Math")).unwrap();
        bank.add_question(build_question(3, "History")).unwrap();

        let removed = bank.delete_subject("Math").unwrap();

        assert_eq!(removed, 2);
        assert!(!bank.subjects().contains(&"Math".to_owned()));
        assert!(bank.questions().iter().all(|q| q.subject() != "Math"));
        assert_eq!(bank.questions().len(), 1);
    }

    #[test]
    fn delete_unknown_subject_fails_without_changes() {
        let (bank, _) = service();
        bank.add_question(build_question(1, DEFAULT_SUBJECT)).unwrap();

        assert!(matches!(
            bank.delete_subject("Nope").unwrap_err(),
            BankError::SubjectNotFound(_)
        ));
        assert_eq!(bank.questions().len(), 1);
    }

    #[test]
    fn subject_counts_follow_subject_order() {
        let (bank, _) = service();
        bank.create_subject("Math").unwrap();
        bank.add_question(build_question(1, "Math")).unwrap();
        bank.add_question(build_question(2, "Math")).unwrap();

        let counts = bank.subject_counts();
        assert_eq!(
            counts,
            vec![(DEFAULT_SUBJECT.to_owned(), 0), ("Math".to_owned(), 2)]
        );
    }
}
