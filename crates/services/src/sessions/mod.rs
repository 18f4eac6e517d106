//! Practice sessions: question selection, the in-memory quiz state machine,
//! and the runner that ties both to storage and statistics.

pub mod plan;
pub mod quiz;
pub mod runner;

pub use plan::{select_questions, QuestionCount, Selection, Shortfall};
pub use quiz::{AnswerCheck, PracticeMode, QuizReport, QuizSession, ReviewEntry, Step};
pub use runner::{PracticeService, QuizConfig, StartedQuiz};
