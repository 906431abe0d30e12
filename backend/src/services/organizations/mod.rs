//! Organization signup: `POST /api/organizations/register`.
//!
//! The form is checked field by field and failures come back as `400` with
//! the offending fields. A complete form is logged (without its passwords)
//! and answered with `501`: no account backend exists to register it with.

use crate::error::AppError;
use actix_web::web::{post, scope};
use actix_web::{web, HttpResponse, Scope};
use certverify_common::model::organization::OrganizationRegistration;
use log::info;

const API_PATH: &str = "/api/organizations";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/register", post().to(register))
}

async fn register(form: web::Json<OrganizationRegistration>) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    form.validate().map_err(AppError::Validation)?;
    info!(
        "Registration attempt: '{}' ({:?}), contact {} <{}>",
        form.organization_name.trim(),
        form.organization_type,
        form.contact_person.trim(),
        form.email.trim()
    );
    Err(AppError::NotImplemented(
        "Organization registration is not available yet".into(),
    ))
}
