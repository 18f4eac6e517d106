//! Versioned backup document: export/import format and the offline repair
//! pass that restores the answer-index invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::{QuestionRecord, StatisticsRecord};

/// Format version written into every exported document.
pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackupError {
    #[error("backup document is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("backup document is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("backup io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A full export of the three collections.
///
/// `questions` and `subjects` are required on import; `statistics` is
/// optional and defaults to the importer's current value when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    pub questions: Vec<QuestionRecord>,
    pub subjects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<StatisticsRecord>,
}

/// Loose mirror used to distinguish "missing field" from "bad JSON".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBackup {
    version: Option<String>,
    export_date: Option<DateTime<Utc>>,
    questions: Option<Vec<QuestionRecord>>,
    subjects: Option<Vec<String>>,
    statistics: Option<StatisticsRecord>,
}

impl BackupDocument {
    #[must_use]
    pub fn new(
        export_date: DateTime<Utc>,
        questions: Vec<QuestionRecord>,
        subjects: Vec<String>,
        statistics: StatisticsRecord,
    ) -> Self {
        Self {
            version: BACKUP_VERSION.to_owned(),
            export_date: Some(export_date),
            questions,
            subjects,
            statistics: Some(statistics),
        }
    }

    /// Parses and validates a backup document.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Malformed` for invalid JSON and
    /// `BackupError::MissingField` when `questions` or `subjects` is absent.
    pub fn parse(json: &str) -> Result<Self, BackupError> {
        let raw: RawBackup = serde_json::from_str(json)?;
        let questions = raw.questions.ok_or(BackupError::MissingField("questions"))?;
        let subjects = raw.subjects.ok_or(BackupError::MissingField("subjects"))?;

        Ok(Self {
            version: raw.version.unwrap_or_else(|| BACKUP_VERSION.to_owned()),
            export_date: raw.export_date,
            questions,
            subjects,
            statistics: raw.statistics,
        })
    }

    /// Reads and validates a backup document from a file.
    ///
    /// # Errors
    ///
    /// Returns `BackupError` for io, JSON, or missing-field failures.
    pub fn read_from(path: impl AsRef<std::path::Path>) -> Result<Self, BackupError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serializes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::Malformed` if serialization fails.
    pub fn to_json(&self) -> Result<String, BackupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document to a file, overwriting existing content.
    ///
    /// # Errors
    ///
    /// Returns `BackupError` for serialization or io failures.
    pub fn write_to(&self, path: impl AsRef<std::path::Path>) -> Result<(), BackupError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

//
// ─── REPAIR ────────────────────────────────────────────────────────────────────
//

/// Outcome of a repair pass over a backup document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepairReport {
    /// Total questions inspected.
    pub total: usize,
    /// Questions whose `correctAnswer` was rewritten to the flagged position.
    pub rewritten: usize,
    /// Zero-based positions of questions with no answer flagged correct
    /// (reported, left unchanged).
    pub missing_flag: Vec<usize>,
    /// Zero-based positions of questions that had more than one flag
    /// (trimmed to the first).
    pub multi_flag: Vec<usize>,
}

impl RepairReport {
    /// Number of questions with inconsistencies the repair could not or did
    /// not silently fix.
    #[must_use]
    pub fn issues(&self) -> usize {
        self.missing_flag.len() + self.multi_flag.len()
    }
}

/// Rewrites each question's `correctAnswer` to the position of its flagged
/// answer.
///
/// A question with no flagged answer is reported and left unchanged; a
/// question with several keeps only the first flag.
pub fn repair(document: &mut BackupDocument) -> RepairReport {
    let mut report = RepairReport {
        total: document.questions.len(),
        ..RepairReport::default()
    };

    for (position, question) in document.questions.iter_mut().enumerate() {
        let first_flagged = question.answers.iter().position(|a| a.is_correct);

        match first_flagged {
            None => report.missing_flag.push(position),
            Some(index) => {
                if question.correct_answer != index {
                    question.correct_answer = index;
                    report.rewritten += 1;
                }

                let flags = question.answers.iter().filter(|a| a.is_correct).count();
                if flags > 1 {
                    for (i, answer) in question.answers.iter_mut().enumerate() {
                        answer.is_correct = i == index;
                    }
                    report.multi_flag.push(position);
                }
            }
        }
    }

    report
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::AnswerRecord;

    fn record(correct_answer: usize, flags: &[bool]) -> QuestionRecord {
        QuestionRecord {
            id: 1,
            text: "Q?".into(),
            answers: flags
                .iter()
                .enumerate()
                .map(|(i, &is_correct)| AnswerRecord {
                    text: format!("option {i}"),
                    is_correct,
                })
                .collect(),
            correct_answer,
            subject: "Math".into(),
            difficulty: "Medium".into(),
        }
    }

    fn document(questions: Vec<QuestionRecord>) -> BackupDocument {
        BackupDocument {
            version: BACKUP_VERSION.into(),
            export_date: None,
            questions,
            subjects: vec!["Math".into()],
            statistics: None,
        }
    }

    #[test]
    fn parse_rejects_missing_subjects() {
        let err = BackupDocument::parse(r#"{"version": "1.0", "questions": []}"#).unwrap_err();
        assert!(matches!(err, BackupError::MissingField("subjects")));
    }

    #[test]
    fn parse_rejects_missing_questions() {
        let err = BackupDocument::parse(r#"{"subjects": []}"#).unwrap_err();
        assert!(matches!(err, BackupError::MissingField("questions")));
    }

    #[test]
    fn parse_accepts_document_without_statistics() {
        let doc =
            BackupDocument::parse(r#"{"questions": [], "subjects": ["Math"]}"#).unwrap();
        assert!(doc.statistics.is_none());
        assert_eq!(doc.version, BACKUP_VERSION);
    }

    #[test]
    fn repair_rewrites_mismatched_index() {
        let mut doc = document(vec![record(0, &[false, true, false, false])]);
        let report = repair(&mut doc);

        assert_eq!(report.rewritten, 1);
        assert_eq!(report.issues(), 0);
        assert_eq!(doc.questions[0].correct_answer, 1);
        // round-trip invariant: record now converts into a valid Question
        assert!(doc.questions[0].clone().into_question().is_ok());
    }

    #[test]
    fn repair_keeps_first_of_multiple_flags() {
        let mut doc = document(vec![record(2, &[false, true, true, false])]);
        let report = repair(&mut doc);

        assert_eq!(report.multi_flag, vec![0]);
        assert_eq!(doc.questions[0].correct_answer, 1);
        let flags: Vec<bool> = doc.questions[0].answers.iter().map(|a| a.is_correct).collect();
        assert_eq!(flags, vec![false, true, false, false]);
        assert!(doc.questions[0].clone().into_question().is_ok());
    }

    #[test]
    fn repair_reports_flagless_question_unchanged() {
        let original = record(3, &[false, false, false, false]);
        let mut doc = document(vec![original.clone()]);
        let report = repair(&mut doc);

        assert_eq!(report.missing_flag, vec![0]);
        assert_eq!(report.rewritten, 0);
        assert_eq!(doc.questions[0], original);
    }

    #[test]
    fn repair_leaves_consistent_document_untouched() {
        let mut doc = document(vec![record(1, &[false, true, false, false])]);
        let before = doc.clone();
        let report = repair(&mut doc);

        assert_eq!(report.rewritten, 0);
        assert_eq!(report.issues(), 0);
        assert_eq!(doc, before);
    }
}
