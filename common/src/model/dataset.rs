use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named collection of certificate records an organization matches against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: i64,
    pub name: String,
    pub record_count: u64,
    pub upload_date: NaiveDate,
    pub last_accessed: NaiveDate,
    pub status: DatasetStatus,
    /// MD5 of the uploaded file. Demo datasets seeded at startup have none.
    pub content_md5: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetStatus {
    Active,
}

impl DatasetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetStatus::Active => "active",
        }
    }
}

impl std::str::FromStr for DatasetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(DatasetStatus::Active),
            other => Err(format!("unknown dataset status '{}'", other)),
        }
    }
}
