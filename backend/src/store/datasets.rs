use crate::store::{Repository, Result, Store, StoreError};
use certverify_common::model::certificate::CertificateRecord;
use certverify_common::model::dataset::{Dataset, DatasetStatus};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATASET_COLUMNS: &str =
    "id, name, record_count, upload_date, last_accessed, status, content_md5";

/// Datasets and the certificate records they contain.
#[derive(Debug, Clone)]
pub struct DatasetRepository {
    store: Store,
}

/// Raw column values of a `datasets` row, converted after the query.
struct DatasetRow {
    id: i64,
    name: String,
    record_count: i64,
    upload_date: String,
    last_accessed: String,
    status: String,
    content_md5: Option<String>,
}

impl DatasetRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(DatasetRow {
            id: row.get(0)?,
            name: row.get(1)?,
            record_count: row.get(2)?,
            upload_date: row.get(3)?,
            last_accessed: row.get(4)?,
            status: row.get(5)?,
            content_md5: row.get(6)?,
        })
    }

    fn into_dataset(self) -> Result<Dataset> {
        let corrupt = |reason: String| StoreError::Corrupt {
            table: "datasets",
            reason,
        };
        Ok(Dataset {
            id: self.id,
            name: self.name,
            record_count: u64::try_from(self.record_count)
                .map_err(|_| corrupt(format!("negative record count {}", self.record_count)))?,
            upload_date: parse_date(&self.upload_date).map_err(corrupt)?,
            last_accessed: parse_date(&self.last_accessed).map_err(corrupt)?,
            status: self.status.parse::<DatasetStatus>().map_err(corrupt)?,
            content_md5: self.content_md5,
        })
    }
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| format!("bad date '{}': {}", value, e))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl DatasetRepository {
    pub(crate) fn new(store: Store) -> Self {
        DatasetRepository { store }
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.store.connection()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM datasets", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Inserts the dataset and all its records in one transaction. Content
    /// already stored under the same MD5 fails with `DuplicateContent`.
    pub fn insert_with_records(
        &self,
        dataset: &Dataset,
        records: &[CertificateRecord],
    ) -> Result<i64> {
        let mut conn = self.store.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO datasets (name, record_count, upload_date, last_accessed, status, content_md5)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                dataset.name,
                dataset.record_count as i64,
                format_date(dataset.upload_date),
                format_date(dataset.last_accessed),
                dataset.status.as_str(),
                dataset.content_md5,
            ],
        )
        .map_err(|e| match (&e, &dataset.content_md5) {
            (rusqlite::Error::SqliteFailure(err, _), Some(md5))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::DuplicateContent { md5: md5.clone() }
            }
            _ => StoreError::from(e),
        })?;
        let dataset_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO certificate_records (dataset_id, certificate_id, name, course)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in records {
                stmt.execute(params![
                    dataset_id,
                    record.certificate_id,
                    record.name,
                    record.course
                ])?;
            }
        }
        tx.commit()?;
        Ok(dataset_id)
    }

    pub fn find_by_md5(&self, md5: &str) -> Result<Option<Dataset>> {
        let conn = self.store.connection()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM datasets WHERE content_md5 = ?1", DATASET_COLUMNS),
                params![md5],
                DatasetRow::from_row,
            )
            .optional()?;
        row.map(DatasetRow::into_dataset).transpose()
    }

    /// Finds the record for `certificate_id` (case-insensitive, surrounding
    /// whitespace ignored). When several datasets hold the ID, the most
    /// recently uploaded one wins. Returns the owning dataset id as well.
    pub fn lookup_certificate(
        &self,
        certificate_id: &str,
    ) -> Result<Option<(i64, CertificateRecord)>> {
        let conn = self.store.connection()?;
        let found = conn
            .query_row(
                "SELECT r.dataset_id, r.certificate_id, r.name, r.course
                 FROM certificate_records r
                 JOIN datasets d ON d.id = r.dataset_id
                 WHERE r.certificate_id = ?1 COLLATE NOCASE AND d.status = 'active'
                 ORDER BY r.dataset_id DESC, r.id ASC
                 LIMIT 1",
                params![certificate_id.trim()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        CertificateRecord {
                            certificate_id: row.get(1)?,
                            name: row.get(2)?,
                            course: row.get(3)?,
                        },
                    ))
                },
            )
            .optional()?;
        Ok(found)
    }

    pub fn touch(&self, dataset_id: i64, accessed: NaiveDate) -> Result<()> {
        let conn = self.store.connection()?;
        conn.execute(
            "UPDATE datasets SET last_accessed = ?1 WHERE id = ?2",
            params![format_date(accessed), dataset_id],
        )?;
        Ok(())
    }
}

impl Repository for DatasetRepository {
    type Item = Dataset;

    fn list(&self) -> Result<Vec<Dataset>> {
        let conn = self.store.connection()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM datasets ORDER BY id", DATASET_COLUMNS))?;
        let rows = stmt
            .query_map([], DatasetRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(DatasetRow::into_dataset).collect()
    }

    fn get(&self, id: i64) -> Result<Option<Dataset>> {
        let conn = self.store.connection()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM datasets WHERE id = ?1", DATASET_COLUMNS),
                params![id],
                DatasetRow::from_row,
            )
            .optional()?;
        row.map(DatasetRow::into_dataset).transpose()
    }

    fn insert(&self, item: &Dataset) -> Result<i64> {
        self.insert_with_records(item, &[])
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let mut conn = self.store.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM certificate_records WHERE dataset_id = ?1",
            params![id],
        )?;
        let removed = tx.execute("DELETE FROM datasets WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}
