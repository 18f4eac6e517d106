//! Export and import of the full application state as a versioned backup
//! document.

use std::path::Path;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::Question;
use storage::{BackupDocument, QuizStore};
use storage::records::{QuestionRecord, StatisticsRecord};

use crate::error::BackupError;

/// Outcome of a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub questions: usize,
    pub subjects: usize,
    /// True when the document carried statistics and they replaced the
    /// current ones.
    pub statistics_replaced: bool,
}

/// Exports and imports the three collections as one document.
#[derive(Clone)]
pub struct BackupService {
    store: Arc<dyn QuizStore>,
    clock: Clock,
}

impl BackupService {
    #[must_use]
    pub fn new(store: Arc<dyn QuizStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Builds a backup document of the current state, stamped with the
    /// export date.
    #[must_use]
    pub fn export(&self) -> BackupDocument {
        let questions = self
            .store
            .load_questions()
            .iter()
            .map(QuestionRecord::from_question)
            .collect();
        let subjects = self.store.load_subjects();
        let statistics = StatisticsRecord::from_statistics(&self.store.load_statistics());

        BackupDocument::new(self.clock.now(), questions, subjects, statistics)
    }

    /// Exports the current state to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Document` for serialization or io failures.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<BackupDocument, BackupError> {
        let document = self.export();
        document.write_to(path)?;
        Ok(document)
    }

    /// Replaces the entire state with the document's contents.
    ///
    /// Every question is converted and validated before anything is saved,
    /// so a bad document leaves the current state untouched. Statistics are
    /// replaced only when the document carries them.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::InvalidQuestion` for a record violating the
    /// question invariant and `BackupError::Storage` on save failure.
    pub fn import(&self, document: BackupDocument) -> Result<ImportSummary, BackupError> {
        let mut questions = Vec::with_capacity(document.questions.len());
        for record in document.questions {
            let id = record.id;
            let question: Question = record
                .into_question()
                .map_err(|source| BackupError::InvalidQuestion { id, source })?;
            questions.push(question);
        }

        self.store.save_questions(&questions)?;
        self.store.save_subjects(&document.subjects)?;

        let statistics_replaced = match document.statistics {
            Some(record) => {
                self.store.save_statistics(&record.into_statistics())?;
                true
            }
            None => false,
        };

        Ok(ImportSummary {
            questions: questions.len(),
            subjects: document.subjects.len(),
            statistics_replaced,
        })
    }

    /// Reads, validates, and imports a backup file.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Document` for unreadable or malformed files,
    /// plus everything [`BackupService::import`] can fail with.
    pub fn import_from_file(&self, path: impl AsRef<Path>) -> Result<ImportSummary, BackupError> {
        let document = BackupDocument::read_from(path)?;
        self.import(document)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
