//! Server-side state of one operator's verification workflow.
//!
//! A session replaces the per-screen state of the dashboard: which file is
//! selected, whether a verification is in flight, and what the last verdict
//! was. Every mutation goes through the methods below so the workflow rules
//! (one job at a time, new file clears old results, reset discards late
//! results) hold no matter which endpoint drives the session.

use crate::model::certificate::ExtractedCertificateData;
use crate::model::verification::{VerificationOutcome, VerificationResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A certificate document that passed intake and was saved by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
    pub md5: String,
    /// Name of the saved copy inside the upload directory.
    pub storage_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("No certificate file selected")]
    NoFileSelected,
    #[error("A verification is already in progress for this session")]
    Busy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSession {
    pub id: String,
    pub verified_by: String,
    pub file: Option<SelectedFile>,
    pub result: Option<VerificationResult>,
    pub extracted: ExtractedCertificateData,
    pub loading: bool,
    pub job_id: Option<String>,
    #[serde(skip)]
    generation: u64,
}

/// Everything a background job needs to verify the session's file.
#[derive(Debug, Clone)]
pub struct PendingVerification {
    pub file: SelectedFile,
    pub verified_by: String,
    pub generation: u64,
}

impl VerificationSession {
    pub fn new(id: impl Into<String>, verified_by: impl Into<String>) -> Self {
        VerificationSession {
            id: id.into(),
            verified_by: verified_by.into(),
            file: None,
            result: None,
            extracted: ExtractedCertificateData::default(),
            loading: false,
            job_id: None,
            generation: 0,
        }
    }

    /// Makes `file` the selected file and clears the previous verdict.
    /// Returns the replaced file when its stored copy is no longer referenced.
    pub fn select_file(
        &mut self,
        file: SelectedFile,
    ) -> Result<Option<SelectedFile>, SessionError> {
        if self.loading {
            return Err(SessionError::Busy);
        }
        let replaced = self
            .file
            .replace(file)
            .filter(|old| !self.holds(&old.storage_key));
        self.result = None;
        self.extracted = ExtractedCertificateData::default();
        Ok(replaced)
    }

    /// Whether the selected file is stored under `storage_key`.
    pub fn holds(&self, storage_key: &str) -> bool {
        self.file
            .as_ref()
            .is_some_and(|file| file.storage_key == storage_key)
    }

    pub fn begin_verification(
        &mut self,
        job_id: impl Into<String>,
    ) -> Result<PendingVerification, SessionError> {
        if self.loading {
            return Err(SessionError::Busy);
        }
        let file = self.file.clone().ok_or(SessionError::NoFileSelected)?;
        self.loading = true;
        self.job_id = Some(job_id.into());
        Ok(PendingVerification {
            file,
            verified_by: self.verified_by.clone(),
            generation: self.generation,
        })
    }

    /// Applies a finished job's outcome. Returns `false` when the session was
    /// reset after the job started; the outcome is then dropped.
    pub fn complete(&mut self, generation: u64, outcome: &VerificationOutcome) -> bool {
        if generation != self.generation {
            return false;
        }
        self.extracted = outcome.extracted.clone();
        self.result = Some(VerificationResult::from(outcome));
        self.loading = false;
        true
    }

    pub fn fail(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    /// Clears the workflow. Returns the released file, unless a job is still
    /// reading it; that job releases the file when it finishes.
    pub fn reset(&mut self) -> Option<SelectedFile> {
        let released = if self.loading { None } else { self.file.take() };
        self.file = None;
        self.result = None;
        self.extracted = ExtractedCertificateData::default();
        self.loading = false;
        self.job_id = None;
        self.generation += 1;
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::verification::VerificationStatus;

    fn file(name: &str) -> SelectedFile {
        SelectedFile {
            file_name: name.to_string(),
            content_type: "application/pdf".to_string(),
            size: 1024,
            md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            storage_key: format!("s1-{}", name),
        }
    }

    fn outcome(status: VerificationStatus) -> VerificationOutcome {
        VerificationOutcome {
            status,
            details: "details".to_string(),
            extracted: ExtractedCertificateData {
                name: Some("John Doe".to_string()),
                certificate_id: Some("CERT-2024-001".to_string()),
                course: Some("Computer Science".to_string()),
            },
        }
    }

    #[test]
    fn selecting_a_file_clears_previous_verdict() {
        let mut session = VerificationSession::new("s1", "admin@university.edu");
        session.select_file(file("a.pdf")).unwrap();
        let pending = session.begin_verification("job-1").unwrap();
        assert!(session.complete(pending.generation, &outcome(VerificationStatus::Valid)));
        assert!(session.result.is_some());

        let replaced = session.select_file(file("b.pdf")).unwrap();
        assert_eq!(replaced.unwrap().file_name, "a.pdf");
        assert_eq!(session.file.as_ref().unwrap().file_name, "b.pdf");
        assert!(session.result.is_none());
        assert!(session.extracted.is_empty());
    }

    #[test]
    fn verification_requires_a_file() {
        let mut session = VerificationSession::new("s1", "admin@university.edu");
        assert_eq!(
            session.begin_verification("job-1").unwrap_err(),
            SessionError::NoFileSelected
        );
        assert!(!session.loading);
    }

    #[test]
    fn only_one_verification_at_a_time() {
        let mut session = VerificationSession::new("s1", "admin@university.edu");
        session.select_file(file("a.pdf")).unwrap();
        session.begin_verification("job-1").unwrap();
        assert_eq!(session.begin_verification("job-2").unwrap_err(), SessionError::Busy);
        assert_eq!(session.select_file(file("b.pdf")).unwrap_err(), SessionError::Busy);
        assert_eq!(session.job_id.as_deref(), Some("job-1"));
    }

    #[test]
    fn reset_discards_late_outcome() {
        let mut session = VerificationSession::new("s1", "admin@university.edu");
        session.select_file(file("a.pdf")).unwrap();
        let pending = session.begin_verification("job-1").unwrap();
        assert!(session.reset().is_none());

        assert!(!session.complete(pending.generation, &outcome(VerificationStatus::Invalid)));
        assert!(session.result.is_none());
        assert!(session.file.is_none());
        assert!(!session.loading);
        assert!(session.job_id.is_none());
    }

    #[test]
    fn failure_clears_loading_flag() {
        let mut session = VerificationSession::new("s1", "admin@university.edu");
        session.select_file(file("a.pdf")).unwrap();
        let pending = session.begin_verification("job-1").unwrap();
        assert!(session.fail(pending.generation));
        assert!(!session.loading);
        assert!(session.result.is_none());
    }

    #[test]
    fn reselecting_the_same_stored_copy_releases_nothing() {
        let mut session = VerificationSession::new("s1", "admin@university.edu");
        assert!(session.select_file(file("a.pdf")).unwrap().is_none());
        assert!(session.select_file(file("a.pdf")).unwrap().is_none());
        assert!(session.holds("s1-a.pdf"));
    }

    #[test]
    fn idle_reset_releases_the_selected_file() {
        let mut session = VerificationSession::new("s1", "admin@university.edu");
        session.select_file(file("a.pdf")).unwrap();
        assert_eq!(session.reset().unwrap().storage_key, "s1-a.pdf");
        assert!(!session.holds("s1-a.pdf"));
        assert!(session.reset().is_none());
    }
}
