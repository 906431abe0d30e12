//! Certificate datasets an organization verifies against.
//!
//! Routes under `/api/datasets`:
//! - `GET ""`: all datasets, optionally narrowed with `?search=` (case-insensitive
//!   substring of the dataset name).
//! - `POST /upload`: multipart form with a `name` part and a `file` part.
//!   CSV content is imported with its certificate records; `.xlsx`/`.xls`
//!   pass the file gate but are refused with `415`.
//! - `GET /{id}`: one dataset.
//! - `DELETE /{id}`: removes the dataset and its records.

use actix_web::web::{delete, get, post, scope};
use actix_web::Scope;

mod get;
pub mod import;
mod list;
mod remove;
mod upload;

const API_PATH: &str = "/api/datasets";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/upload", post().to(upload::process))
        .route("/{dataset_id}", get().to(get::process))
        .route("/{dataset_id}", delete().to(remove::process))
}
