//! Error type returned by every HTTP handler.
//!
//! Each variant maps to one status code; the body is always JSON of the form
//! `{"error": "<message>"}`, with the offending `fields` added for form
//! validation failures.

use crate::engine::EngineError;
use crate::intake::IntakeError;
use crate::services::datasets::import::ImportError;
use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use certverify_common::model::organization::FieldError;
use certverify_common::model::session::SessionError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Invalid form submission")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    UnsupportedMedia(String),
    #[error("{0}")]
    NotImplemented(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Internal(String),
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Malformed upload: {}", err))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(err: actix_web::error::BlockingError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Intake(_)
            | AppError::Import(_)
            | AppError::Validation(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::NoFileSelected) => StatusCode::BAD_REQUEST,
            AppError::Session(SessionError::Busy)
            | AppError::Conflict(_)
            | AppError::Store(StoreError::DuplicateContent { .. }) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Engine(EngineError::Extraction(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Engine(EngineError::Store(_))
            | AppError::Store(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(fields) => json!({ "error": self.to_string(), "fields": fields }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
