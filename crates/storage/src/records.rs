//! Persisted shapes for the quiz collections.
//!
//! These mirror the domain types so the store can serialize/deserialize
//! without leaking storage concerns into the domain layer. Field names are
//! camelCase to match the on-disk/backup JSON format (`correctAnswer`,
//! `isCorrect`, `timeSpent`, ...).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    Answer, DailyTally, HistoryEntry, Question, QuestionError, QuestionId, Statistics,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: u64,
    /// The question text; named `question` on disk for format compatibility.
    #[serde(rename = "question")]
    pub text: String,
    pub answers: Vec<AnswerRecord>,
    pub correct_answer: usize,
    pub subject: String,
    pub difficulty: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().value(),
            text: question.text().to_owned(),
            answers: question
                .answers()
                .iter()
                .map(|a| AnswerRecord {
                    text: a.text().to_owned(),
                    is_correct: a.is_correct(),
                })
                .collect(),
            correct_answer: question.correct_answer(),
            subject: question.subject().to_owned(),
            difficulty: question.difficulty().to_owned(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored record violates the
    /// exactly-one-correct-answer invariant.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let answers = self
            .answers
            .into_iter()
            .map(|a| Answer::new(a.text, a.is_correct))
            .collect();
        Question::from_persisted(
            QuestionId::new(self.id),
            self.text,
            answers,
            self.correct_answer,
            self.subject,
            self.difficulty,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyTallyRecord {
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub date: DateTime<Utc>,
    pub correct: u32,
    pub total: u32,
    pub time_spent: u64,
    pub accuracy: u8,
}

impl HistoryRecord {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            date: entry.date(),
            correct: entry.correct(),
            total: entry.total(),
            time_spent: entry.time_spent_secs(),
            accuracy: entry.accuracy(),
        }
    }

    #[must_use]
    pub fn into_entry(self) -> HistoryEntry {
        HistoryEntry::from_persisted(
            self.date,
            self.correct,
            self.total,
            self.time_spent,
            self.accuracy,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsRecord {
    #[serde(default)]
    pub total_questions: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub daily: BTreeMap<String, DailyTallyRecord>,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
}

impl StatisticsRecord {
    #[must_use]
    pub fn from_statistics(stats: &Statistics) -> Self {
        Self {
            total_questions: stats.total_questions(),
            correct_answers: stats.correct_answers(),
            current_streak: stats.current_streak(),
            longest_streak: stats.longest_streak(),
            daily: stats
                .daily()
                .iter()
                .map(|(day, tally)| {
                    (
                        day.clone(),
                        DailyTallyRecord {
                            correct: tally.correct,
                            total: tally.total,
                        },
                    )
                })
                .collect(),
            history: stats.history().iter().map(HistoryRecord::from_entry).collect(),
        }
    }

    #[must_use]
    pub fn into_statistics(self) -> Statistics {
        let daily = self
            .daily
            .into_iter()
            .map(|(day, tally)| {
                (
                    day,
                    DailyTally {
                        correct: tally.correct,
                        total: tally.total,
                    },
                )
            })
            .collect();
        let history = self.history.into_iter().map(HistoryRecord::into_entry).collect();
        Statistics::from_persisted(
            self.total_questions,
            self.correct_answers,
            self.current_streak,
            self.longest_streak,
            daily,
            history,
        )
    }
}
