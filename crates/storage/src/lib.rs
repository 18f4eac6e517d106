#![forbid(unsafe_code)]

pub mod backup;
pub mod records;
pub mod seed;
pub mod store;

pub use backup::{repair, BackupDocument, BackupError, RepairReport, BACKUP_VERSION};
pub use store::{InMemoryStore, JsonFileStore, QuizStore, StorageError, DEFAULT_SUBJECT};
