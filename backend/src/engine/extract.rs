use certverify_common::model::certificate::ExtractedCertificateData;
use certverify_common::model::session::SelectedFile;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("certificate document '{file_name}' is not readable: {reason}")]
    Unreadable { file_name: String, reason: String },
}

/// Turns a saved certificate document into structured fields.
///
/// Implementations may fill only some fields; the engine treats any missing
/// field as an incomplete extraction.
pub trait Extractor: Send + Sync {
    fn extract(
        &self,
        document: &Path,
        file: &SelectedFile,
    ) -> Result<ExtractedCertificateData, ExtractionError>;
}

/// Returns the same fields for every readable document.
///
/// Stands in for a real OCR service until one is wired in.
#[derive(Debug, Clone)]
pub struct FixtureExtractor {
    fixture: ExtractedCertificateData,
}

impl FixtureExtractor {
    pub fn new(fixture: ExtractedCertificateData) -> Self {
        FixtureExtractor { fixture }
    }
}

impl Default for FixtureExtractor {
    fn default() -> Self {
        FixtureExtractor::new(ExtractedCertificateData {
            name: Some("John Doe".to_string()),
            certificate_id: Some("CERT-2024-001".to_string()),
            course: Some("Computer Science".to_string()),
        })
    }
}

impl Extractor for FixtureExtractor {
    fn extract(
        &self,
        document: &Path,
        file: &SelectedFile,
    ) -> Result<ExtractedCertificateData, ExtractionError> {
        fs::metadata(document).map_err(|e| ExtractionError::Unreadable {
            file_name: file.file_name.clone(),
            reason: e.to_string(),
        })?;
        Ok(self.fixture.clone())
    }
}
