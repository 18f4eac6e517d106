use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// Maximum number of history entries retained, most-recent-first.
pub const HISTORY_CAP: usize = 100;

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// Summary of one completed practice session. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    date: DateTime<Utc>,
    correct: u32,
    total: u32,
    time_spent_secs: u64,
    accuracy: u8,
}

impl HistoryEntry {
    /// Builds an entry, computing accuracy as `round(correct/total × 100)`.
    #[must_use]
    pub fn new(date: DateTime<Utc>, correct: u32, total: u32, time_spent_secs: u64) -> Self {
        Self {
            date,
            correct,
            total,
            time_spent_secs,
            accuracy: accuracy_percent(correct, total),
        }
    }

    /// Rehydrate an entry from storage, keeping the stored accuracy.
    #[must_use]
    pub fn from_persisted(
        date: DateTime<Utc>,
        correct: u32,
        total: u32,
        time_spent_secs: u64,
        accuracy: u8,
    ) -> Self {
        Self {
            date,
            correct,
            total,
            time_spent_secs,
            accuracy,
        }
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn time_spent_secs(&self) -> u64 {
        self.time_spent_secs
    }

    #[must_use]
    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }
}

/// Per-day answer tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DailyTally {
    pub correct: u32,
    pub total: u32,
}

//
// ─── STATISTICS ────────────────────────────────────────────────────────────────
//

/// Running practice statistics: counters, streaks, daily buckets and a
/// bounded session history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statistics {
    total_questions: u32,
    correct_answers: u32,
    current_streak: u32,
    longest_streak: u32,
    daily: BTreeMap<String, DailyTally>,
    history: Vec<HistoryEntry>,
}

impl Statistics {
    /// Rehydrate statistics from persisted storage.
    #[must_use]
    pub fn from_persisted(
        total_questions: u32,
        correct_answers: u32,
        current_streak: u32,
        longest_streak: u32,
        daily: BTreeMap<String, DailyTally>,
        history: Vec<HistoryEntry>,
    ) -> Self {
        Self {
            total_questions,
            correct_answers,
            current_streak,
            longest_streak,
            daily,
            history,
        }
    }

    /// Records a single answered question.
    ///
    /// Updates totals, today's daily bucket, and the streak: a correct answer
    /// extends the current streak (and possibly the longest), a wrong answer
    /// resets the current streak to zero.
    pub fn record_answer(&mut self, correct: bool, today: NaiveDate) {
        let bucket = self.daily.entry(today.to_string()).or_default();
        bucket.total += 1;
        if correct {
            bucket.correct += 1;
        }

        self.total_questions += 1;
        if correct {
            self.correct_answers += 1;
            self.current_streak += 1;
            self.longest_streak = self.longest_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
    }

    /// Appends a session summary at the front of the history, dropping the
    /// oldest entries beyond [`HISTORY_CAP`].
    pub fn record_session(&mut self, entry: HistoryEntry) {
        self.history.insert(0, entry);
        self.history.truncate(HISTORY_CAP);
    }

    // Accessors
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    #[must_use]
    pub fn daily(&self) -> &BTreeMap<String, DailyTally> {
        &self.daily
    }

    /// Session history, most recent first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Overall accuracy in whole percent, zero before any answer.
    #[must_use]
    pub fn accuracy_percent(&self) -> u8 {
        accuracy_percent(self.correct_answers, self.total_questions)
    }
}

/// Accuracy as a whole-number percentage, `round(correct/total × 100)`.
/// Zero when `total` is zero.
#[must_use]
pub fn accuracy_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(correct) / f64::from(total) * 100.0).round();
    // round() of a 0..=100 percentage always fits in u8
    pct as u8
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
