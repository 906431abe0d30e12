use serde::{Deserialize, Serialize};

/// Status of a background job as reported by `GET /api/verifications/status/{job_id}`.
///
/// A verification job carries its `VerificationOutcome` serialized as JSON in
/// `Completed`, so the client can render the verdict without a second request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    InProgress(u32),
    Completed(String),
    Failed(String),
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, JobStatus::Completed(_) | JobStatus::Failed(_))
    }
}
