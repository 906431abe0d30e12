use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    University,
    Company,
    Government,
}

/// Signup form submitted by an organization.
///
/// Only the form's own checks are performed on it; there is no credential
/// backend behind registration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationRegistration {
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub organization_type: Option<OrganizationType>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// A form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl OrganizationRegistration {
    /// Required-field checks of the signup form. Returns every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let required = [
            ("organization_name", &self.organization_name),
            ("contact_person", &self.contact_person),
            ("email", &self.email),
            ("password", &self.password),
            ("confirm_password", &self.confirm_password),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, "This field is required"));
            }
        }
        if self.organization_type.is_none() {
            errors.push(FieldError::new("organization_type", "This field is required"));
        }
        let email = self.email.trim();
        if !email.is_empty() && !(email.contains('@') && email.contains('.')) {
            errors.push(FieldError::new("email", "Enter a valid email address"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> OrganizationRegistration {
        OrganizationRegistration {
            organization_name: "University of Example".to_string(),
            organization_type: Some(OrganizationType::University),
            address: None,
            contact_person: "John Doe".to_string(),
            phone: None,
            email: "admin@university.edu".to_string(),
            password: "s3cret".to_string(),
            confirm_password: "s3cret".to_string(),
        }
    }

    #[test]
    fn complete_form_passes() {
        assert!(complete_form().validate().is_ok());
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let mut form = complete_form();
        form.address = Some(String::new());
        form.phone = Some(String::new());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn reports_every_missing_required_field() {
        let errors = OrganizationRegistration::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "organization_name",
                "contact_person",
                "email",
                "password",
                "confirm_password",
                "organization_type",
            ]
        );
    }

    #[test]
    fn rejects_malformed_email() {
        let mut form = complete_form();
        form.email = "admin-at-university".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors, vec![FieldError::new("email", "Enter a valid email address")]);
    }
}
