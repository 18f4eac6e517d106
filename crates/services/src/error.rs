//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionError;
use storage::BackupError as BackupDocumentError;
use storage::StorageError;

/// Errors emitted by `BankService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("input text is empty")]
    EmptyInput,
    #[error("no valid questions found in the input")]
    NoQuestionsParsed,
    #[error("subject \"{0}\" already exists")]
    DuplicateSubject(String),
    #[error("subject \"{0}\" does not exist")]
    SubjectNotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by quiz sessions and the practice runner.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for the selected filter")]
    NoQuestionsAvailable,
    #[error("answer index {index} is out of range")]
    InvalidChoice { index: usize },
    #[error("this question's answer is already locked")]
    AnswerLocked,
    #[error("session is already graded")]
    AlreadyGraded,
    #[error("session has not been graded yet")]
    NotGraded,
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `BackupService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackupError {
    #[error(transparent)]
    Document(#[from] BackupDocumentError),
    #[error("imported question {id} is invalid: {source}")]
    InvalidQuestion { id: u64, source: QuestionError },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
