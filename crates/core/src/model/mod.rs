mod ids;
mod question;
mod stats;

pub use ids::{ParseIdError, QuestionId};
pub use question::{Answer, Question, QuestionError};
pub use stats::{accuracy_percent, DailyTally, HistoryEntry, Statistics, HISTORY_CAP};
