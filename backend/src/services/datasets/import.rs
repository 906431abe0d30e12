//! CSV import of certificate datasets.
//!
//! The header line decides the delimiter and must name the three columns the
//! engine matches on. Rows are then parsed with the `csv` crate and scanned
//! in parallel for the first one without a certificate ID.

use certverify_common::model::certificate::CertificateRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use rayon::prelude::*;
use regex::Regex;
use thiserror::Error;

const CERTIFICATE_ID_COLUMNS: [&str; 3] = ["certificate_id", "certificateid", "cert_id"];
const NAME_COLUMNS: [&str; 3] = ["name", "student_name", "holder_name"];
const COURSE_COLUMNS: [&str; 2] = ["course", "program"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("CSV file is not valid UTF-8")]
    NotUtf8,
    #[error("CSV file is empty")]
    Empty,
    #[error("CSV header cells must not be empty")]
    EmptyHeaderCell,
    #[error("CSV header cell '{0}' must contain only letters, spaces, '-' or '_'")]
    InvalidHeaderCell(String),
    #[error("CSV header is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("First invalid row at: row {row}, column '{column}'")]
    InvalidRow { row: usize, column: &'static str },
    #[error("CSV file has no data rows")]
    NoRows,
    #[error("Malformed CSV: {0}")]
    Malformed(String),
}

/// Picks the candidate delimiter occurring most often in the header line.
/// `,` wins when no candidate occurs or the top count is shared.
pub(crate) fn detect_delimiter(header_line: &str) -> char {
    let counts: Vec<(char, usize)> = [',', ';', '\t', '|']
        .iter()
        .map(|&d| (d, header_line.matches(d).count()))
        .collect();
    let top = counts.iter().map(|&(_, n)| n).max().unwrap_or(0);
    let mut leaders = counts.iter().filter(|&&(_, n)| n == top);
    match (leaders.next(), leaders.next()) {
        (Some(&(d, _)), None) if top > 0 => d,
        _ => ',',
    }
}

fn unquote(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
        .trim()
}

fn validate_header_cells(
    header_line: &str,
    delimiter: char,
    header_re: &Regex,
) -> Result<(), ImportError> {
    for cell in header_line.split(delimiter) {
        let cell = unquote(cell);
        if cell.is_empty() {
            return Err(ImportError::EmptyHeaderCell);
        }
        if !header_re.is_match(cell) {
            return Err(ImportError::InvalidHeaderCell(cell.to_string()));
        }
    }
    Ok(())
}

/// `"Certificate ID"` and `"certificate-id"` both become `certificate_id`.
pub(crate) fn normalize_title(title: &str) -> String {
    unquote(title)
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

fn find_column(
    titles: &[String],
    aliases: &[&str],
    canonical: &'static str,
) -> Result<usize, ImportError> {
    titles
        .iter()
        .position(|t| aliases.contains(&t.as_str()))
        .ok_or(ImportError::MissingColumn(canonical))
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or_default()
}

pub fn parse_dataset_csv(bytes: &[u8]) -> Result<Vec<CertificateRecord>, ImportError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ImportError::NotUtf8)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let header_line = text
        .lines()
        .next()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .ok_or(ImportError::Empty)?;

    let delimiter = detect_delimiter(header_line);
    // Letters, marks, spaces, hyphen, underscore.
    let header_re = Regex::new(r"^[\p{L}\p{M}\s\-_]+$")
        .map_err(|e| ImportError::Malformed(format!("Regex error: {}", e)))?;
    validate_header_cells(header_line, delimiter, &header_re)?;

    let titles: Vec<String> = header_line.split(delimiter).map(normalize_title).collect();
    let id_idx = find_column(&titles, &CERTIFICATE_ID_COLUMNS, "certificate_id")?;
    let name_idx = find_column(&titles, &NAME_COLUMNS, "name")?;
    let course_idx = find_column(&titles, &COURSE_COLUMNS, "course")?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<(usize, StringRecord)> = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ImportError::Malformed(e.to_string()))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        rows.push((line, record));
    }
    if rows.is_empty() {
        return Err(ImportError::NoRows);
    }

    if let Some((line, _)) = rows
        .par_iter()
        .find_first(|(_, record)| cell(record, id_idx).is_empty())
    {
        return Err(ImportError::InvalidRow {
            row: *line,
            column: "certificate_id",
        });
    }

    Ok(rows
        .iter()
        .map(|(_, record)| CertificateRecord {
            certificate_id: cell(record, id_idx).to_string(),
            name: cell(record, name_idx).to_string(),
            course: cell(record, course_idx).to_string(),
        })
        .collect())
}
