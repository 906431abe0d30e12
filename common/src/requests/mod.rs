use crate::filter::{DateFilter, HistoryFilter, StatusFilter};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Body of `POST /api/verifications/sessions`.
/// `verified_by` identifies the operator recorded on every verification.
pub struct CreateSessionRequest {
    pub verified_by: String,
}

/// Query string of `GET /api/datasets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetQuery {
    pub search: Option<String>,
}

/// Query string of `GET /api/verifications/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub date: Option<DateFilter>,
}

impl From<HistoryQuery> for HistoryFilter {
    fn from(query: HistoryQuery) -> Self {
        HistoryFilter {
            search: query.search.unwrap_or_default(),
            status: query.status.unwrap_or_default(),
            date: query.date.unwrap_or_default(),
        }
    }
}

/// Response of `POST /api/verifications/sessions/{id}/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationStarted {
    pub job_id: String,
}
