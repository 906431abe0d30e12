//! SQLite-backed persistence for datasets and verification history.
//!
//! Every operation opens its own connection on the configured file, so a
//! `Store` is a cheap, clonable handle that can be moved into blocking tasks.
//! Handlers and jobs depend on the `Repository` trait rather than on SQL.

mod datasets;
mod history;
pub mod seed;

pub use datasets::DatasetRepository;
pub use history::HistoryRepository;

use certverify_common::model::stats::DashboardStats;
use certverify_common::model::verification::VerificationStatus;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// How long a connection waits for another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt row in {table}: {reason}")]
    Corrupt { table: &'static str, reason: String },
    #[error("a dataset with content {md5} already exists")]
    DuplicateContent { md5: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Collection-style access to one kind of stored record.
pub trait Repository {
    type Item;

    fn list(&self) -> Result<Vec<Self::Item>>;
    fn get(&self, id: i64) -> Result<Option<Self::Item>>;
    /// Stores `item` under a fresh id (the item's own id is ignored) and
    /// returns that id.
    fn insert(&self, item: &Self::Item) -> Result<i64>;
    /// Returns `false` when nothing was stored under `id`.
    fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens or creates the database at `path` and applies the schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Store { path: path.into() };
        store.migrate()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS datasets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                record_count INTEGER NOT NULL,
                upload_date TEXT NOT NULL,
                last_accessed TEXT NOT NULL,
                status TEXT NOT NULL,
                content_md5 TEXT
            );

            DROP INDEX IF EXISTS idx_datasets_md5;
            CREATE UNIQUE INDEX IF NOT EXISTS idx_datasets_content_md5
                ON datasets(content_md5);

            CREATE TABLE IF NOT EXISTS certificate_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                dataset_id INTEGER NOT NULL,
                certificate_id TEXT NOT NULL,
                name TEXT NOT NULL,
                course TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_certificate
                ON certificate_records(certificate_id COLLATE NOCASE);
            CREATE INDEX IF NOT EXISTS idx_records_dataset ON certificate_records(dataset_id);

            CREATE TABLE IF NOT EXISTS verifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_name TEXT NOT NULL,
                student_name TEXT NOT NULL,
                certificate_id TEXT NOT NULL,
                course TEXT NOT NULL,
                verified_at TEXT NOT NULL,
                status TEXT NOT NULL,
                verified_by TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_verifications_at ON verifications(verified_at);
            "#,
        )?;
        Ok(())
    }

    pub fn datasets(&self) -> DatasetRepository {
        DatasetRepository::new(self.clone())
    }

    pub fn history(&self) -> HistoryRepository {
        HistoryRepository::new(self.clone())
    }

    pub fn stats(&self) -> Result<DashboardStats> {
        let history = self.history();
        Ok(DashboardStats {
            total_verifications: history.count(None)?,
            valid_certificates: history.count(Some(VerificationStatus::Valid))?,
            invalid_certificates: history.count(Some(VerificationStatus::Invalid))?,
            datasets_count: self.datasets().count()?,
        })
    }
}
