//! Key-value persistence for the three quiz collections.
//!
//! Each collection lives under one fixed key and is overwritten wholesale on
//! every save. Loads fail soft: an absent or unreadable record yields the
//! documented default instead of an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::records::{QuestionRecord, StatisticsRecord};
use quiz_core::model::{Question, Statistics};

/// Subject assigned to questions that have not been categorized yet.
pub const DEFAULT_SUBJECT: &str = "General";

/// Storage keys for the three collections.
pub const QUESTIONS_KEY: &str = "questions.json";
pub const SUBJECTS_KEY: &str = "subjects.json";
pub const STATISTICS_KEY: &str = "statistics.json";

/// Errors surfaced by storage adapters.
///
/// Only writes surface errors; reads recover to defaults internally.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Persistence contract for the question bank, subject list and statistics.
pub trait QuizStore: Send + Sync {
    /// Loads the question bank, or an empty bank if absent or unreadable.
    fn load_questions(&self) -> Vec<Question>;

    /// Overwrites the stored question bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be written.
    fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError>;

    /// Loads the subject list, or the single default subject if absent.
    fn load_subjects(&self) -> Vec<String>;

    /// Overwrites the stored subject list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the collection cannot be written.
    fn save_subjects(&self, subjects: &[String]) -> Result<(), StorageError>;

    /// Loads statistics, or zeroed statistics if absent or unreadable.
    fn load_statistics(&self) -> Statistics;

    /// Overwrites the stored statistics.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    fn save_statistics(&self, statistics: &Statistics) -> Result<(), StorageError>;
}

fn default_subjects() -> Vec<String> {
    vec![DEFAULT_SUBJECT.to_owned()]
}

fn questions_from_records(records: Vec<QuestionRecord>) -> Vec<Question> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match record.into_question() {
                Ok(question) => Some(question),
                Err(err) => {
                    log::warn!("skipping stored question {id}: {err}");
                    None
                }
            }
        })
        .collect()
}

//
// ─── JSON FILE STORE ───────────────────────────────────────────────────────────
//

/// File-backed store: one pretty-printed JSON file per collection inside a
/// data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates, if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.dir.join(key);
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("failed to read {}: {err}; using defaults", path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("failed to decode {}: {err}; using defaults", path.display());
                None
            }
        }
    }

    fn write_key<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(key), json)?;
        Ok(())
    }
}

impl QuizStore for JsonFileStore {
    fn load_questions(&self) -> Vec<Question> {
        self.read_key::<Vec<QuestionRecord>>(QUESTIONS_KEY)
            .map(questions_from_records)
            .unwrap_or_default()
    }

    fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let records: Vec<QuestionRecord> =
            questions.iter().map(QuestionRecord::from_question).collect();
        self.write_key(QUESTIONS_KEY, &records)
    }

    fn load_subjects(&self) -> Vec<String> {
        self.read_key::<Vec<String>>(SUBJECTS_KEY)
            .unwrap_or_else(default_subjects)
    }

    fn save_subjects(&self, subjects: &[String]) -> Result<(), StorageError> {
        self.write_key(SUBJECTS_KEY, &subjects)
    }

    fn load_statistics(&self) -> Statistics {
        self.read_key::<StatisticsRecord>(STATISTICS_KEY)
            .map(StatisticsRecord::into_statistics)
            .unwrap_or_default()
    }

    fn save_statistics(&self, statistics: &Statistics) -> Result<(), StorageError> {
        self.write_key(STATISTICS_KEY, &StatisticsRecord::from_statistics(statistics))
    }
}

//
// ─── IN-MEMORY STORE ───────────────────────────────────────────────────────────
//

#[derive(Debug)]
struct InMemoryInner {
    questions: Vec<Question>,
    subjects: Vec<String>,
    statistics: Statistics,
}

/// Simple in-memory store for testing and prototyping.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<InMemoryInner>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(InMemoryInner {
                questions: Vec::new(),
                subjects: default_subjects(),
                statistics: Statistics::default(),
            })),
        }
    }
}

impl QuizStore for InMemoryStore {
    fn load_questions(&self) -> Vec<Question> {
        self.inner
            .lock()
            .map(|inner| inner.questions.clone())
            .unwrap_or_default()
    }

    fn save_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        inner.questions = questions.to_vec();
        Ok(())
    }

    fn load_subjects(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.subjects.clone())
            .unwrap_or_else(|_| default_subjects())
    }

    fn save_subjects(&self, subjects: &[String]) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        inner.subjects = subjects.to_vec();
        Ok(())
    }

    fn load_statistics(&self) -> Statistics {
        self.inner
            .lock()
            .map(|inner| inner.statistics.clone())
            .unwrap_or_default()
    }

    fn save_statistics(&self, statistics: &Statistics) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().map_err(|_| StorageError::Poisoned)?;
        inner.statistics = statistics.clone();
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
