//! Scheduling and execution of verification jobs.
//!
//! 1. The handler marks the session as verifying and registers a `Pending`
//!    job, then answers `202 Accepted` with the job id.
//! 2. A Tokio task waits out the configured latency and runs the engine on the
//!    blocking pool (extraction, dataset lookup, history insert).
//! 3. The outcome is applied to the session, unless the session was reset in
//!    the meantime, and the job is reported `Completed` with the outcome JSON
//!    or `Failed` with the error message. A stored copy the session let go of
//!    while the job was reading it is deleted before the report.

use crate::config::AppConfig;
use crate::engine::VerificationEngine;
use crate::error::AppError;
use crate::intake::discard_stored_copy;
use crate::job_controller::state::JobsState;
use crate::services::verifications::sessions::session_not_found;
use crate::sessions::SessionsState;
use actix_web::{web, HttpResponse};
use certverify_common::jobs::JobStatus;
use certverify_common::model::session::PendingVerification;
use certverify_common::requests::VerificationStarted;
use chrono::Utc;
use log::{error, info};

pub(crate) async fn process(
    session_id: web::Path<String>,
    sessions: web::Data<SessionsState>,
    jobs: web::Data<JobsState>,
    engine: web::Data<VerificationEngine>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let job_id = schedule_verification_job(
        session_id.into_inner(),
        sessions.get_ref().clone(),
        jobs.get_ref().clone(),
        engine.get_ref().clone(),
        config.get_ref().clone(),
    )
    .await?;
    Ok(HttpResponse::Accepted().json(VerificationStarted { job_id }))
}

async fn schedule_verification_job(
    session_id: String,
    sessions: SessionsState,
    jobs: JobsState,
    engine: VerificationEngine,
    config: AppConfig,
) -> Result<String, AppError> {
    let job_id = JobsState::new_job_id();
    let pending = sessions
        .update(&session_id, |s| s.begin_verification(job_id.clone()))
        .await
        .ok_or_else(|| session_not_found(&session_id))??;
    jobs.register(&job_id).await;
    info!(
        "Scheduled verification job {} for '{}' (session {})",
        job_id, pending.file.file_name, session_id
    );

    let task_job_id = job_id.clone();
    tokio::spawn(async move {
        run_verification_job(task_job_id, session_id, pending, sessions, jobs, engine, config)
            .await;
    });

    Ok(job_id)
}

async fn run_verification_job(
    job_id: String,
    session_id: String,
    pending: PendingVerification,
    sessions: SessionsState,
    jobs: JobsState,
    engine: VerificationEngine,
    config: AppConfig,
) {
    if !config.verify_latency.is_zero() {
        tokio::time::sleep(config.verify_latency).await;
    }
    jobs.report(&job_id, JobStatus::InProgress(0)).await;

    let file = pending.file.clone();
    let verified_by = pending.verified_by.clone();
    let handle =
        tokio::task::spawn_blocking(move || engine.verify(&file, &verified_by, Utc::now()));

    let status = match handle.await {
        Ok(Ok((outcome, record))) => {
            let applied = sessions
                .update(&session_id, |s| s.complete(pending.generation, &outcome))
                .await
                .unwrap_or(false);
            if !applied {
                info!(
                    "Session {} was reset; verification {} is kept in the history only",
                    session_id, record.id
                );
            }
            serde_json::to_string(&outcome)
                .map(JobStatus::Completed)
                .map_err(|e| e.to_string())
        }
        Ok(Err(e)) => Err(e.to_string()),
        Err(join_err) => Err(format!("join error: {}", join_err)),
    };

    let status = status.unwrap_or_else(|failure| {
        error!("Verification job {} failed: {}", job_id, failure);
        JobStatus::Failed(failure)
    });
    let still_selected = sessions
        .update(&session_id, |s| {
            if matches!(status, JobStatus::Failed(_)) {
                s.fail(pending.generation);
            }
            s.holds(&pending.file.storage_key)
        })
        .await
        .unwrap_or(false);
    if !still_selected {
        discard_stored_copy(&config.upload_dir, &pending.file);
    }
    jobs.report(&job_id, status).await;
}
