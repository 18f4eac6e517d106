//! Bundled first-run dataset.
//!
//! Loaded once at bootstrap when no local collections exist; a broken bundle
//! degrades to an empty start, never a crash.

use crate::backup::BackupDocument;

static SEED_JSON: &str = include_str!("../data/seed.json");

/// Returns the bundled seed dataset, if it parses.
#[must_use]
pub fn seed_document() -> Option<BackupDocument> {
    match BackupDocument::parse(SEED_JSON) {
        Ok(document) => Some(document),
        Err(err) => {
            log::warn!("bundled seed dataset is invalid: {err}");
            None
        }
    }
}
