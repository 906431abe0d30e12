use serde::{Deserialize, Serialize};

/// Counters shown on the dashboard overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_verifications: u64,
    pub valid_certificates: u64,
    pub invalid_certificates: u64,
    pub datasets_count: u64,
}
