#![forbid(unsafe_code)]

//! Application services over the question store: bank management, practice
//! sessions, statistics, and backup.

pub mod app_services;
pub mod backup;
pub mod bank;
pub mod error;
pub mod sessions;
pub mod stats;

pub use app_services::AppServices;
pub use backup::{BackupService, ImportSummary};
pub use bank::{BankService, ParseSummary};
pub use error::{BackupError, BankError, SessionError, StatsError};
pub use quiz_core::Clock;
pub use sessions::{
    AnswerCheck, PracticeMode, PracticeService, QuestionCount, QuizConfig, QuizReport,
    QuizSession, Shortfall, StartedQuiz, Step,
};
pub use stats::StatsService;
