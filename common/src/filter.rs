//! Search and filter rules shared by the dataset list and the verification
//! history.
//!
//! Search is a case-insensitive substring test against every searchable field
//! of a record; a record matches when any field contains the term. Status and
//! date filters use `all` as the identity and compose with the search by AND.

use crate::model::dataset::Dataset;
use crate::model::verification::{VerificationRecord, VerificationStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Dataset {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl Searchable for VerificationRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.student_name.as_str(),
            self.certificate_id.as_str(),
            self.course.as_str(),
            self.file_name.as_str(),
        ]
    }
}

pub fn contains_ignore_case(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

pub fn matches_term<T: Searchable>(item: &T, term: &str) -> bool {
    term.is_empty()
        || item
            .search_fields()
            .into_iter()
            .any(|field| contains_ignore_case(field, term))
}

/// Keeps the items with at least one searchable field containing `term`.
pub fn filter_by_term<T: Searchable>(items: Vec<T>, term: &str) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| matches_term(item, term))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Valid,
    Invalid,
}

impl StatusFilter {
    pub fn matches(&self, status: VerificationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Valid => status == VerificationStatus::Valid,
            StatusFilter::Invalid => status == VerificationStatus::Invalid,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "valid" => Ok(StatusFilter::Valid),
            "invalid" => Ok(StatusFilter::Invalid),
            other => Err(format!("unknown status filter '{}'", other)),
        }
    }
}

/// Time window over the verification timestamp, evaluated in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    Yesterday,
    Week,
}

impl DateFilter {
    pub fn matches(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            DateFilter::All => true,
            DateFilter::Today => at.date_naive() == now.date_naive(),
            DateFilter::Yesterday => now.date_naive().pred_opt() == Some(at.date_naive()),
            DateFilter::Week => at <= now && at >= now - Duration::days(7),
        }
    }
}

impl FromStr for DateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DateFilter::All),
            "today" => Ok(DateFilter::Today),
            "yesterday" => Ok(DateFilter::Yesterday),
            "week" => Ok(DateFilter::Week),
            other => Err(format!("unknown date filter '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub search: String,
    pub status: StatusFilter,
    pub date: DateFilter,
}

impl HistoryFilter {
    pub fn matches(&self, record: &VerificationRecord, now: DateTime<Utc>) -> bool {
        matches_term(record, &self.search)
            && self.status.matches(record.status)
            && self.date.matches(record.verified_at, now)
    }

    pub fn apply(
        &self,
        records: Vec<VerificationRecord>,
        now: DateTime<Utc>,
    ) -> Vec<VerificationRecord> {
        records
            .into_iter()
            .filter(|record| self.matches(record, now))
            .collect()
    }
}
