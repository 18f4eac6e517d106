//! Aggregate wiring for the application layer.

use std::sync::Arc;

use quiz_core::Clock;
use storage::QuizStore;
use storage::seed::seed_document;

use crate::backup::BackupService;
use crate::bank::BankService;
use crate::sessions::PracticeService;
use crate::stats::StatsService;

/// All services wired over one store and one clock.
#[derive(Clone)]
pub struct AppServices {
    pub bank: BankService,
    pub practice: PracticeService,
    pub stats: StatsService,
    pub backup: BackupService,
}

impl AppServices {
    /// Wires every service over the given store.
    ///
    /// A completely fresh store (no questions, no recorded practice) is
    /// seeded with the bundled starter bank; a failing seed import is logged
    /// and otherwise ignored, the app works fine with an empty bank.
    #[must_use]
    pub fn open(store: Arc<dyn QuizStore>, clock: Clock) -> Self {
        let stats = StatsService::new(store.clone(), clock);
        let services = Self {
            bank: BankService::new(store.clone(), clock),
            practice: PracticeService::new(store.clone(), stats.clone(), clock),
            stats,
            backup: BackupService::new(store, clock),
        };
        services.seed_if_empty();
        services
    }

    fn seed_if_empty(&self) {
        let untouched = self.bank.questions().is_empty()
            && self.stats.overview().total_questions() == 0;
        if !untouched {
            return;
        }
        let Some(document) = seed_document() else {
            return;
        };
        match self.backup.import(document) {
            Ok(summary) => log::info!(
                "seeded starter bank: {} questions, {} subjects",
                summary.questions,
                summary.subjects
            ),
            Err(err) => log::warn!("starter bank could not be seeded: {err}"),
        }
    }
}
