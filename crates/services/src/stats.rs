//! Statistics aggregator: running counters, streaks, and session history.

use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{HistoryEntry, Statistics};
use storage::QuizStore;

use crate::error::StatsError;

/// Applies answer and session outcomes to the persisted statistics.
///
/// Every mutation is load-apply-save against the store; there is no batching
/// or rollback.
#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn QuizStore>,
    clock: Clock,
}

impl StatsService {
    #[must_use]
    pub fn new(store: Arc<dyn QuizStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Records one answered question (counters, daily bucket, streak).
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if the updated record cannot be saved.
    pub fn record_answer(&self, correct: bool) -> Result<(), StatsError> {
        let mut stats = self.store.load_statistics();
        stats.record_answer(correct, self.clock.today());
        self.store.save_statistics(&stats)?;
        Ok(())
    }

    /// Appends one completed-session entry to the history (capped, newest
    /// first).
    ///
    /// # Errors
    ///
    /// Returns `StatsError::Storage` if the updated record cannot be saved.
    pub fn record_session(
        &self,
        correct: u32,
        total: u32,
        time_spent_secs: u64,
    ) -> Result<HistoryEntry, StatsError> {
        let entry = HistoryEntry::new(self.clock.now(), correct, total, time_spent_secs);
        let mut stats = self.store.load_statistics();
        stats.record_session(entry.clone());
        self.store.save_statistics(&stats)?;
        Ok(entry)
    }

    /// Current persisted statistics.
    #[must_use]
    pub fn overview(&self) -> Statistics {
        self.store.load_statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_clock;
    use storage::InMemoryStore;

    fn service() -> StatsService {
        StatsService::new(Arc::new(InMemoryStore::new()), fixed_clock())
    }

    #[test]
    fn record_answer_persists_immediately() {
        let service = service();
        service.record_answer(true).unwrap();
        service.record_answer(true).unwrap();
        service.record_answer(false).unwrap();

        let stats = service.overview();
        assert_eq!(stats.total_questions(), 3);
        assert_eq!(stats.correct_answers(), 2);
        assert_eq!(stats.current_streak(), 0);
        assert_eq!(stats.longest_streak(), 2);
    }

    #[test]
    fn record_session_prepends_history() {
        let service = service();
        service.record_session(1, 5, 30).unwrap();
        let entry = service.record_session(4, 5, 45).unwrap();

        let stats = service.overview();
        assert_eq!(stats.history().len(), 2);
        assert_eq!(stats.history()[0], entry);
        assert_eq!(stats.history()[0].accuracy(), 80);
    }
}
