//! Certificate verification workflow and its history.
//!
//! Routes under `/api/verifications`:
//! - `POST /sessions`: opens a session for the operator named in `verified_by`.
//! - `GET /sessions/{session_id}`: current session state.
//! - `POST /sessions/{session_id}/file`: multipart certificate upload (`file`
//!   part). Rejected files leave the session untouched; an accepted file
//!   becomes the selection and clears the previous verdict.
//! - `POST /sessions/{session_id}/verify`: schedules a verification job and
//!   returns its `job_id` right away.
//! - `POST /sessions/{session_id}/reset`: clears selection and verdict.
//! - `GET /status/{job_id}`: `JobStatus` of a verification job.
//! - `GET /history`: past verifications, filtered by `search`, `status`, `date`.
//! - `GET /history/{record_id}`: one past verification.
//! - `POST /history/{record_id}/alert`: alert e-mail hook, not available.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod get_status;
mod history;
mod sessions;
mod upload;
mod verify;

const API_PATH: &str = "/api/verifications";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/sessions", post().to(sessions::create))
        .route("/sessions/{session_id}", get().to(sessions::get))
        .route("/sessions/{session_id}/file", post().to(upload::process))
        .route("/sessions/{session_id}/verify", post().to(verify::process))
        .route("/sessions/{session_id}/reset", post().to(sessions::reset))
        .route("/status/{job_id}", get().to(get_status::process))
        .route("/history", get().to(history::list))
        .route("/history/{record_id}", get().to(history::get))
        .route("/history/{record_id}/alert", post().to(history::alert))
}
