use serde::{Deserialize, Serialize};

/// One row of an uploaded dataset: the facts an organization vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub certificate_id: String,
    pub name: String,
    pub course: String,
}

/// Fields pulled out of a certificate document by the extraction service.
///
/// Every field is optional: extraction may succeed partially, and the
/// verification engine decides what a partial result means.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedCertificateData {
    pub name: Option<String>,
    pub certificate_id: Option<String>,
    pub course: Option<String>,
}

impl ExtractedCertificateData {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.certificate_id.is_none() && self.course.is_none()
    }

    /// Names of the fields that are absent or blank, in display order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.name) {
            missing.push("name");
        }
        if is_blank(&self.certificate_id) {
            missing.push("certificateId");
        }
        if is_blank(&self.course) {
            missing.push("course");
        }
        missing
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or_default().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_treats_blank_as_missing() {
        let data = ExtractedCertificateData {
            name: Some("  ".to_string()),
            certificate_id: Some("CERT-2024-001".to_string()),
            course: None,
        };
        assert_eq!(data.missing_fields(), vec!["name", "course"]);
        assert!(!data.is_empty());
        assert!(ExtractedCertificateData::default().is_empty());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let data = ExtractedCertificateData {
            name: Some("John Doe".to_string()),
            certificate_id: Some("CERT-2024-001".to_string()),
            course: Some("Computer Science".to_string()),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["certificateId"], "CERT-2024-001");
        assert_eq!(json["name"], "John Doe");
    }
}
