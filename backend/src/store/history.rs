use crate::store::{Repository, Result, Store, StoreError};
use certverify_common::model::verification::{VerificationRecord, VerificationStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};

const HISTORY_COLUMNS: &str =
    "id, file_name, student_name, certificate_id, course, verified_at, status, verified_by";

/// Past verification attempts, newest first.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    store: Store,
}

struct HistoryRow {
    id: i64,
    file_name: String,
    student_name: String,
    certificate_id: String,
    course: String,
    verified_at: String,
    status: String,
    verified_by: String,
}

impl HistoryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(HistoryRow {
            id: row.get(0)?,
            file_name: row.get(1)?,
            student_name: row.get(2)?,
            certificate_id: row.get(3)?,
            course: row.get(4)?,
            verified_at: row.get(5)?,
            status: row.get(6)?,
            verified_by: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<VerificationRecord> {
        let corrupt = |reason: String| StoreError::Corrupt {
            table: "verifications",
            reason,
        };
        let verified_at = DateTime::parse_from_rfc3339(&self.verified_at)
            .map_err(|e| corrupt(format!("bad timestamp '{}': {}", self.verified_at, e)))?
            .with_timezone(&Utc);
        Ok(VerificationRecord {
            id: self.id,
            file_name: self.file_name,
            student_name: self.student_name,
            certificate_id: self.certificate_id,
            course: self.course,
            verified_at,
            status: self.status.parse::<VerificationStatus>().map_err(corrupt)?,
            verified_by: self.verified_by,
        })
    }
}

/// Fixed-width UTC timestamps sort chronologically as text.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl HistoryRepository {
    pub(crate) fn new(store: Store) -> Self {
        HistoryRepository { store }
    }

    /// Number of records, optionally restricted to one status.
    pub fn count(&self, status: Option<VerificationStatus>) -> Result<u64> {
        let conn = self.store.connection()?;
        let count: i64 = match status {
            Some(status) => conn.query_row(
                "SELECT COUNT(*) FROM verifications WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM verifications", [], |row| row.get(0))?,
        };
        Ok(count.max(0) as u64)
    }
}

impl Repository for HistoryRepository {
    type Item = VerificationRecord;

    fn list(&self) -> Result<Vec<VerificationRecord>> {
        let conn = self.store.connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM verifications ORDER BY verified_at DESC, id DESC",
            HISTORY_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], HistoryRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(HistoryRow::into_record).collect()
    }

    fn get(&self, id: i64) -> Result<Option<VerificationRecord>> {
        let conn = self.store.connection()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM verifications WHERE id = ?1", HISTORY_COLUMNS),
                params![id],
                HistoryRow::from_row,
            )
            .optional()?;
        row.map(HistoryRow::into_record).transpose()
    }

    fn insert(&self, item: &VerificationRecord) -> Result<i64> {
        let conn = self.store.connection()?;
        conn.execute(
            "INSERT INTO verifications (file_name, student_name, certificate_id, course, verified_at, status, verified_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.file_name,
                item.student_name,
                item.certificate_id,
                item.course,
                format_timestamp(item.verified_at),
                item.status.as_str(),
                item.verified_by,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.store.connection()?;
        let removed = conn.execute("DELETE FROM verifications WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}
