//! Certificate verification server.
//!
//! Operators upload datasets of certificate records, then verify uploaded
//! certificate documents against them through a session-based workflow.
//! Verifications run as background jobs; their outcomes land in a searchable
//! history.

pub mod config;
pub mod engine;
pub mod error;
pub mod intake;
pub mod job_controller;
pub mod services;
pub mod sessions;
pub mod store;

use crate::config::AppConfig;
use crate::engine::{Extractor, VerificationEngine};
use crate::error::AppError;
use crate::job_controller::state::JobsState;
use crate::sessions::SessionsState;
use crate::store::Store;
use actix_web::web;
use std::sync::Arc;

/// Everything the handlers share, registered as `web::Data` on each worker.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Store,
    pub jobs: JobsState,
    pub sessions: SessionsState,
    pub engine: VerificationEngine,
}

impl AppState {
    /// Must be called inside a running Tokio/Actix runtime: it spawns the job
    /// updater and the idle-session sweeper.
    pub fn new(config: AppConfig, store: Store, extractor: Arc<dyn Extractor>) -> Self {
        let jobs = JobsState::launch(config.job_channel_capacity, config.job_retention);
        let sessions = SessionsState::default();
        sessions.spawn_sweeper(config.session_idle_timeout, config.upload_dir.clone());
        let engine = VerificationEngine::new(store.clone(), extractor, config.upload_dir.clone());
        AppState {
            config,
            store,
            jobs,
            sessions,
            engine,
        }
    }

    /// Registers shared state and every API scope on an `App`. Extractor
    /// failures are routed through `AppError` so they answer with the same
    /// JSON error body as the handlers.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(
            web::JsonConfig::default()
                .limit(1024 * 1024)
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::PathConfig::default()
                .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
        )
        .app_data(web::Data::new(self.config.clone()))
        .app_data(web::Data::new(self.store.clone()))
        .app_data(web::Data::new(self.jobs.clone()))
        .app_data(web::Data::new(self.sessions.clone()))
        .app_data(web::Data::new(self.engine.clone()))
        .service(services::datasets::configure_routes())
        .service(services::verifications::configure_routes())
        .service(services::dashboard::configure_routes())
        .service(services::organizations::configure_routes());
    }
}
