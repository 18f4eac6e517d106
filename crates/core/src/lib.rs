#![forbid(unsafe_code)]

pub mod model;
pub mod parser;
pub mod time;

pub use parser::{ParseOutcome, QuestionParser};
pub use time::Clock;
