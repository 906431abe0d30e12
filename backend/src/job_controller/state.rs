//! Tracks background verification jobs.
//!
//! - `JobsState`: clonable, shared table of job statuses plus the sender used
//!   to report status changes. Injected into the Actix app as `web::Data`.
//! - `JobUpdate`: one status change for one job.
//! - `start_job_updater`: the single task that applies `JobUpdate`s to the
//!   table. Every change after registration goes through the channel, so a
//!   job's updates land in the order they were sent. A finished job stays
//!   readable for the retention period, then leaves the table.

use certverify_common::jobs::JobStatus;
use log::warn;
use std::time::Duration;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

#[derive(Clone)]
pub struct JobsState {
    /// Job id to current status. Read by the status endpoint, written by the
    /// updater task (and by `register` for the initial `Pending`).
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,
    /// Sender half used by background tasks to report progress.
    pub tx: mpsc::Sender<JobUpdate>,
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

impl JobsState {
    /// Creates the shared table and spawns its updater on the current runtime.
    pub fn launch(capacity: usize, retention: Duration) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        let updater_state = state.clone();
        tokio::spawn(async move {
            start_job_updater(updater_state, rx, retention).await;
        });
        state
    }

    pub fn new_job_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Registers `job_id` as `Pending`.
    pub async fn register(&self, job_id: &str) {
        self.jobs
            .write()
            .await
            .insert(job_id.to_string(), JobStatus::Pending);
    }

    pub async fn report(&self, job_id: &str, status: JobStatus) {
        let update = JobUpdate {
            job_id: job_id.to_string(),
            status,
        };
        if let Err(err) = self.tx.send(update).await {
            warn!("Job updater is gone, dropping update for {}", err.0.job_id);
        }
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().await.get(job_id).cloned()
    }
}

/// Applies every received `JobUpdate` to the shared table until all senders
/// are dropped. Finished jobs are removed `retention` after their last update.
pub async fn start_job_updater(
    state: JobsState,
    mut rx: mpsc::Receiver<JobUpdate>,
    retention: Duration,
) {
    while let Some(update) = rx.recv().await {
        let finished = update.status.is_finished().then(|| update.job_id.clone());
        state.jobs.write().await.insert(update.job_id, update.status);

        if let Some(job_id) = finished {
            let jobs = Arc::clone(&state.jobs);
            tokio::spawn(async move {
                tokio::time::sleep(retention).await;
                jobs.write().await.remove(&job_id);
            });
        }
    }
}
