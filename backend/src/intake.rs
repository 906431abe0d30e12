//! Upload gate for certificate documents and dataset files.
//!
//! Certificates are gated on the declared MIME type and on size (at most
//! 2 MiB). Dataset files are gated on their extension. Nothing here touches
//! session state: callers only commit a file after every check passed.

use certverify_common::model::session::SelectedFile;
use log::warn;
use mime_guess::from_path;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

pub const MAX_CERTIFICATE_BYTES: u64 = 2 * 1024 * 1024;

pub const ACCEPTED_CERTIFICATE_TYPES: [&str; 5] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const DATASET_EXTENSIONS: [&str; 3] = ["csv", "xlsx", "xls"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("Please upload only PDF, JPG, PNG, or DOC files.")]
    UnsupportedType { content_type: String },
    #[error("File size must be less than 2MB.")]
    TooLarge { size: u64 },
    #[error("Missing file")]
    MissingFile,
    #[error("Please upload a CSV or Excel file (.csv, .xlsx, .xls).")]
    UnsupportedDatasetFile { file_name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Excel,
}

/// MIME type used for the type check.
///
/// The declared type wins whenever one was sent (parameters such as
/// `; charset=` are dropped). Only a part with no declared type falls back to
/// a guess from the file name.
pub fn resolve_content_type(declared: Option<&str>, file_name: &str) -> String {
    let declared = declared
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty());
    match declared {
        Some(ct) => ct,
        None => from_path(file_name)
            .first()
            .map(|mime| mime.essence_str().to_string())
            .unwrap_or_default(),
    }
}

pub fn check_certificate_type(content_type: &str) -> Result<(), IntakeError> {
    if ACCEPTED_CERTIFICATE_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(IntakeError::UnsupportedType {
            content_type: content_type.to_string(),
        })
    }
}

pub fn check_certificate_size(size: u64) -> Result<(), IntakeError> {
    if size > MAX_CERTIFICATE_BYTES {
        Err(IntakeError::TooLarge { size })
    } else {
        Ok(())
    }
}

/// Full gate for a certificate whose size is already known.
pub fn check_certificate(content_type: &str, size: u64) -> Result<(), IntakeError> {
    check_certificate_type(content_type)?;
    check_certificate_size(size)
}

pub fn check_dataset_file(file_name: &str) -> Result<DatasetFormat, IntakeError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => Ok(DatasetFormat::Csv),
        "xlsx" | "xls" => Ok(DatasetFormat::Excel),
        _ => Err(IntakeError::UnsupportedDatasetFile {
            file_name: file_name.to_string(),
        }),
    }
}

/// Extension given to the saved copy of an accepted certificate.
pub fn storage_extension(content_type: &str) -> &'static str {
    match content_type {
        "application/pdf" => "pdf",
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        _ => "bin",
    }
}

/// Name of the saved copy inside the upload directory. Copies are kept per
/// session so releasing one never affects another session.
pub fn storage_key(session_id: &str, md5: &str, content_type: &str) -> String {
    format!("{}-{}.{}", session_id, md5, storage_extension(content_type))
}

/// Deletes the saved copy of a file no session refers to anymore.
pub fn discard_stored_copy(upload_dir: &Path, file: &SelectedFile) {
    match fs::remove_file(upload_dir.join(&file.storage_key)) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove stored copy {}: {}", file.storage_key, e),
    }
}
