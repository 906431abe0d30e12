//! Verification engine: extraction followed by a dataset lookup keyed by the
//! extracted certificate ID.
//!
//! The verdict is a pure function of the extracted fields and the matching
//! dataset record (`decide`), so the same document checked against the same
//! datasets always yields the same verdict.

mod extract;

pub use extract::{ExtractionError, Extractor, FixtureExtractor};

use crate::store::{Repository, Store, StoreError};
use certverify_common::model::certificate::{CertificateRecord, ExtractedCertificateData};
use certverify_common::model::session::SelectedFile;
use certverify_common::model::verification::{
    VerificationOutcome, VerificationRecord, VerificationStatus,
};
use chrono::{DateTime, Utc};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub const VERIFIED_DETAILS: &str =
    "Certificate found in organization database and verified successfully.";
pub const NOT_FOUND_DETAILS: &str =
    "Certificate not found in organization database or details do not match.";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Compares names and courses the way an operator would read them.
fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn same_text(extracted: Option<&String>, expected: &str) -> bool {
    extracted.is_some_and(|value| normalize(value) == normalize(expected))
}

/// Decides the verdict for `extracted` given the dataset record found under
/// its certificate ID, if any.
pub fn decide(
    extracted: ExtractedCertificateData,
    matched: Option<&CertificateRecord>,
) -> VerificationOutcome {
    let missing = extracted.missing_fields();
    let (status, details) = if missing.contains(&"certificateId") {
        (
            VerificationStatus::Invalid,
            "Certificate ID could not be extracted from the document.".to_string(),
        )
    } else if !missing.is_empty() {
        (
            VerificationStatus::Invalid,
            format!(
                "Certificate details could not be fully extracted (missing: {}).",
                missing.join(", ")
            ),
        )
    } else {
        match matched {
            Some(record)
                if same_text(extracted.name.as_ref(), &record.name)
                    && same_text(extracted.course.as_ref(), &record.course) =>
            {
                (VerificationStatus::Valid, VERIFIED_DETAILS.to_string())
            }
            _ => (VerificationStatus::Invalid, NOT_FOUND_DETAILS.to_string()),
        }
    };

    VerificationOutcome {
        status,
        details,
        extracted,
    }
}

/// Runs one verification end to end and records it in the history.
#[derive(Clone)]
pub struct VerificationEngine {
    store: Store,
    extractor: Arc<dyn Extractor>,
    upload_dir: PathBuf,
}

impl VerificationEngine {
    pub fn new(store: Store, extractor: Arc<dyn Extractor>, upload_dir: impl Into<PathBuf>) -> Self {
        VerificationEngine {
            store,
            extractor,
            upload_dir: upload_dir.into(),
        }
    }

    /// Blocking: extraction, SQLite lookups and the history insert all run on
    /// the calling thread.
    pub fn verify(
        &self,
        file: &SelectedFile,
        verified_by: &str,
        now: DateTime<Utc>,
    ) -> Result<(VerificationOutcome, VerificationRecord), EngineError> {
        let document = self.upload_dir.join(&file.storage_key);
        let extracted = self.extractor.extract(&document, file)?;

        let datasets = self.store.datasets();
        let matched = match extracted.certificate_id.as_deref().map(str::trim) {
            Some(certificate_id) if !certificate_id.is_empty() => {
                datasets.lookup_certificate(certificate_id)?
            }
            _ => None,
        };
        if let Some((dataset_id, _)) = &matched {
            datasets.touch(*dataset_id, now.date_naive())?;
        }

        let outcome = decide(extracted, matched.as_ref().map(|(_, record)| record));

        let mut record = VerificationRecord {
            id: 0,
            file_name: file.file_name.clone(),
            student_name: outcome.extracted.name.clone().unwrap_or_default(),
            certificate_id: outcome.extracted.certificate_id.clone().unwrap_or_default(),
            course: outcome.extracted.course.clone().unwrap_or_default(),
            verified_at: now,
            status: outcome.status,
            verified_by: verified_by.to_string(),
        };
        record.id = self.store.history().insert(&record)?;

        info!(
            "Verified '{}' ({}): {}",
            file.file_name,
            record.certificate_id,
            outcome.status
        );
        Ok((outcome, record))
    }
}
