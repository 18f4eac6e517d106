//! Freeform question-text parser.
//!
//! Turns bulk-pasted text of the form
//!
//! ```text
//! Question 1: What is 2 + 2?
//! A. 3
//! B. 4
//! C. 5
//! D. 22
//! Correct answer: B
//! ```
//!
//! into well-formed [`Question`]s. Malformed blocks are skipped and counted,
//! never reported as errors.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

use crate::model::{Question, QuestionId};

/// Difficulty label assigned to every parsed question.
pub const DEFAULT_DIFFICULTY: &str = "Medium";

/// Correct-answer index assumed when a block carries no explicit marker.
///
/// The historical bulk-import format defaulted to the fourth option (D), and
/// existing question banks depend on it, so the default is preserved rather
/// than inferred. Override with [`QuestionParser::with_fallback_choice`].
pub const DEFAULT_FALLBACK_CHOICE: usize = 3;

static BLOCK_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Question\s+\d+:").expect("block split pattern is valid"));

static ANSWER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[A-D]\.\s*(.+)$").expect("answer line pattern is valid"));

static CORRECT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)correct\s+answer:\s*([A-D])").expect("correct marker pattern is valid")
});

/// Result of parsing one batch of freeform text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Accepted questions, in input order.
    pub questions: Vec<Question>,
    /// Number of non-empty blocks discarded as malformed.
    pub skipped: usize,
}

/// Parser for the delimited bulk question format.
#[derive(Debug, Clone, Copy)]
pub struct QuestionParser {
    fallback_choice: usize,
}

impl Default for QuestionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            fallback_choice: DEFAULT_FALLBACK_CHOICE,
        }
    }

    /// Overrides the correct-answer index used when no marker is present.
    #[must_use]
    pub fn with_fallback_choice(mut self, choice: usize) -> Self {
        self.fallback_choice = choice;
        self
    }

    /// Parses freeform text into questions tagged with `subject`.
    ///
    /// Ids derive from `now` (millis) plus the block offset. Blocks with an
    /// empty question text or fewer than two options are skipped and counted.
    /// Pure transformation; persisting the result is the caller's concern.
    #[must_use]
    pub fn parse(&self, input: &str, subject: &str, now: DateTime<Utc>) -> ParseOutcome {
        let millis = now.timestamp_millis();
        let mut questions = Vec::new();
        let mut skipped = 0;

        let blocks = BLOCK_SPLIT
            .split(input)
            .filter(|block| !block.trim().is_empty());

        for (offset, block) in blocks.enumerate() {
            match self.parse_block(block, subject, millis, offset) {
                Some(question) => questions.push(question),
                None => skipped += 1,
            }
        }

        ParseOutcome { questions, skipped }
    }

    fn parse_block(
        &self,
        block: &str,
        subject: &str,
        millis: i64,
        offset: usize,
    ) -> Option<Question> {
        let text = block.lines().map(str::trim).find(|line| !line.is_empty())?;

        let answers: Vec<String> = ANSWER_LINE
            .captures_iter(block)
            .map(|cap| cap[1].trim().to_owned())
            .collect();
        if answers.len() < 2 {
            return None;
        }

        let chosen = CORRECT_MARKER
            .captures(block)
            .and_then(|cap| cap[1].chars().next())
            .map_or(self.fallback_choice, letter_to_index);
        // Clamp to the last parsed option so the one-correct invariant holds
        // even when the fallback (or a stray marker) points past the options.
        let correct = chosen.min(answers.len() - 1);

        Question::new(
            QuestionId::from_timestamp(millis, offset),
            text,
            answers,
            correct,
            subject,
            DEFAULT_DIFFICULTY,
        )
        .ok()
    }
}

fn letter_to_index(letter: char) -> usize {
    (letter.to_ascii_uppercase() as usize).saturating_sub('A' as usize)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
