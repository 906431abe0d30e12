//! Demo content loaded into an empty store: the three datasets and five
//! history entries the dashboard was designed around, plus a handful of
//! certificate records so that verifications against the demo data resolve.
//!
//! The seeded datasets keep their advertised record counts while holding only
//! a sample of their records.

use crate::store::{Repository, Result, Store, StoreError};
use certverify_common::model::certificate::CertificateRecord;
use certverify_common::model::dataset::{Dataset, DatasetStatus};
use certverify_common::model::verification::{VerificationRecord, VerificationStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::info;

struct SeedDataset {
    name: &'static str,
    record_count: u64,
    upload_date: &'static str,
    last_accessed: &'static str,
    records: &'static [(&'static str, &'static str, &'static str)],
}

const DATASETS: [SeedDataset; 3] = [
    SeedDataset {
        name: "Bachelor Degrees 2020-2024",
        record_count: 1250,
        upload_date: "2024-01-15",
        last_accessed: "2024-01-20",
        records: &[
            ("CERT-2024-001", "John Doe", "Computer Science"),
            ("CERT-2023-456", "Mike Johnson", "Engineering"),
        ],
    },
    SeedDataset {
        name: "Master Degrees 2022-2024",
        record_count: 340,
        upload_date: "2024-01-10",
        last_accessed: "2024-01-19",
        records: &[("CERT-2023-789", "Alex Brown", "Law")],
    },
    SeedDataset {
        name: "Certificate Programs 2023",
        record_count: 89,
        upload_date: "2023-12-20",
        last_accessed: "2024-01-18",
        records: &[],
    },
];

// file name, student, certificate id, course, verified at, status
const HISTORY: [(&str, &str, &str, &str, &str, VerificationStatus); 5] = [
    (
        "john_doe_certificate.pdf",
        "John Doe",
        "CERT-2024-001",
        "Computer Science",
        "2024-01-20 14:30",
        VerificationStatus::Valid,
    ),
    (
        "jane_smith_diploma.jpg",
        "Jane Smith",
        "CERT-2024-002",
        "Business Administration",
        "2024-01-20 13:15",
        VerificationStatus::Invalid,
    ),
    (
        "mike_johnson_cert.pdf",
        "Mike Johnson",
        "CERT-2023-456",
        "Engineering",
        "2024-01-19 16:45",
        VerificationStatus::Valid,
    ),
    (
        "sarah_wilson_degree.pdf",
        "Sarah Wilson",
        "CERT-2024-003",
        "Medicine",
        "2024-01-19 11:20",
        VerificationStatus::Invalid,
    ),
    (
        "alex_brown_certificate.jpg",
        "Alex Brown",
        "CERT-2023-789",
        "Law",
        "2024-01-18 09:30",
        VerificationStatus::Valid,
    ),
];

const SEED_OPERATOR: &str = "admin@university.edu";

fn date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| StoreError::Corrupt {
        table: "datasets",
        reason: format!("seed date '{}': {}", value, e),
    })
}

fn timestamp(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .map(|at| at.and_utc())
        .map_err(|e| StoreError::Corrupt {
            table: "verifications",
            reason: format!("seed timestamp '{}': {}", value, e),
        })
}

/// Loads the demo content when the store holds no datasets and no history.
/// Returns whether anything was inserted.
pub fn seed_demo_data(store: &Store) -> Result<bool> {
    let datasets = store.datasets();
    let history = store.history();
    if datasets.count()? > 0 || history.count(None)? > 0 {
        return Ok(false);
    }

    for seed in &DATASETS {
        let dataset = Dataset {
            id: 0,
            name: seed.name.to_string(),
            record_count: seed.record_count,
            upload_date: date(seed.upload_date)?,
            last_accessed: date(seed.last_accessed)?,
            status: DatasetStatus::Active,
            content_md5: None,
        };
        let records: Vec<CertificateRecord> = seed
            .records
            .iter()
            .map(|(certificate_id, name, course)| CertificateRecord {
                certificate_id: certificate_id.to_string(),
                name: name.to_string(),
                course: course.to_string(),
            })
            .collect();
        datasets.insert_with_records(&dataset, &records)?;
    }

    for (file_name, student, certificate_id, course, at, status) in HISTORY {
        history.insert(&VerificationRecord {
            id: 0,
            file_name: file_name.to_string(),
            student_name: student.to_string(),
            certificate_id: certificate_id.to_string(),
            course: course.to_string(),
            verified_at: timestamp(at)?,
            status,
            verified_by: SEED_OPERATOR.to_string(),
        })?;
    }

    info!(
        "Seeded demo data: {} datasets, {} verifications",
        DATASETS.len(),
        HISTORY.len()
    );
    Ok(true)
}
