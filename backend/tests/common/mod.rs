#![allow(dead_code)]

use certverify_backend::config::AppConfig;
use certverify_backend::engine::FixtureExtractor;
use certverify_backend::job_controller::state::JobsState;
use certverify_backend::store::{seed, Store};
use certverify_backend::AppState;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test::TestRequest;
use certverify_common::jobs::JobStatus;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Sends a `TestRequest` builder to the app and returns the status code with
/// the JSON body (`Null` for an empty body).
macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service($app, $req.to_request()).await;
        let status = resp.status();
        let body = actix_web::test::read_body(resp).await;
        let json: serde_json::Value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }};
}

pub const BOUNDARY: &str = "certverify-test-boundary";

/// Application state over a temporary database and upload directory.
/// Must be created inside the test runtime.
pub struct TestEnv {
    pub dir: TempDir,
    pub state: AppState,
}

impl TestEnv {
    pub fn new(seed_demo_data: bool, latency_ms: u64) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: dir.path().join("certverify.sqlite"),
            upload_dir: dir.path().join("uploads"),
            verify_latency: Duration::from_millis(latency_ms),
            seed_demo_data,
            ..AppConfig::default()
        };
        let store = Store::open(&config.database_path).unwrap();
        if seed_demo_data {
            seed::seed_demo_data(&store).unwrap();
        }
        let state = AppState::new(config, store, Arc::new(FixtureExtractor::default()));
        TestEnv { dir, state }
    }
}

pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// Encodes `parts` as a `multipart/form-data` body. Returns the content type
/// header value and the body.
pub fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                        name, value
                    )
                    .as_bytes(),
                );
            }
            Part::File {
                name,
                filename,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

pub fn certificate<'a>(filename: &'a str, content_type: &'a str, bytes: &'a [u8]) -> Vec<Part<'a>> {
    vec![Part::File {
        name: "file",
        filename,
        content_type,
        bytes,
    }]
}

/// Polls the job table until the job finishes.
pub async fn wait_for_job(jobs: &JobsState, job_id: &str) -> JobStatus {
    for _ in 0..500 {
        if let Some(status) = jobs.status(job_id).await {
            if status.is_finished() {
                return status;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not finish", job_id);
}

pub fn create_session(verified_by: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/verifications/sessions")
        .set_json(json!({ "verified_by": verified_by }))
}

pub fn upload_certificate(session_id: &str, parts: &[Part<'_>]) -> TestRequest {
    let (content_type, body) = multipart(parts);
    TestRequest::post()
        .uri(&format!("/api/verifications/sessions/{}/file", session_id))
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
}

pub fn upload_dataset(parts: &[Part<'_>]) -> TestRequest {
    let (content_type, body) = multipart(parts);
    TestRequest::post()
        .uri("/api/datasets/upload")
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
}

pub fn start_verification(session_id: &str) -> TestRequest {
    TestRequest::post().uri(&format!("/api/verifications/sessions/{}/verify", session_id))
}

pub fn get_session(session_id: &str) -> TestRequest {
    TestRequest::get().uri(&format!("/api/verifications/sessions/{}", session_id))
}
