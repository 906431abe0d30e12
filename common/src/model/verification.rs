use crate::model::certificate::ExtractedCertificateData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The verdict surfaced to the operator after a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Valid,
    Invalid,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Valid => "valid",
            VerificationStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(VerificationStatus::Valid),
            "invalid" => Ok(VerificationStatus::Invalid),
            other => Err(format!("unknown verification status '{}'", other)),
        }
    }
}

/// What the verification engine returns for one document.
///
/// This is the payload of a completed verification job and the shape clients
/// render: `{status, details, extracted: {name, certificateId, course}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub status: VerificationStatus,
    pub details: String,
    pub extracted: ExtractedCertificateData,
}

/// Verdict part of an outcome, kept on the session once a job completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub status: VerificationStatus,
    pub details: String,
}

impl From<&VerificationOutcome> for VerificationResult {
    fn from(outcome: &VerificationOutcome) -> Self {
        VerificationResult {
            status: outcome.status,
            details: outcome.details.clone(),
        }
    }
}

/// A past verification attempt as listed in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: i64,
    pub file_name: String,
    pub student_name: String,
    pub certificate_id: String,
    pub course: String,
    pub verified_at: DateTime<Utc>,
    pub status: VerificationStatus,
    pub verified_by: String,
}
