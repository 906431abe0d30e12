use crate::intake::discard_stored_copy;
use certverify_common::model::session::{SelectedFile, VerificationSession};
use log::info;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

struct Entry {
    session: VerificationSession,
    last_used: Instant,
}

/// All open verification sessions, keyed by session id.
#[derive(Clone, Default)]
pub struct SessionsState {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
}

impl SessionsState {
    pub async fn create(&self, verified_by: &str) -> VerificationSession {
        let id = uuid::Uuid::new_v4().to_string();
        let session = VerificationSession::new(id.clone(), verified_by.trim());
        let entry = Entry {
            session: session.clone(),
            last_used: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        session
    }

    pub async fn get(&self, id: &str) -> Option<VerificationSession> {
        self.update(id, |s| s.clone()).await
    }

    /// Runs `f` on the session under the write lock. `None` if no such session.
    pub async fn update<F, T>(&self, id: &str, f: F) -> Option<T>
    where
        F: FnOnce(&mut VerificationSession) -> T,
    {
        self.sessions.write().await.get_mut(id).map(|entry| {
            entry.last_used = Instant::now();
            f(&mut entry.session)
        })
    }

    /// Drops sessions unused for at least `idle`, except those with a job in
    /// flight. Returns the files the dropped sessions had selected.
    pub async fn evict_idle(&self, idle: Duration) -> Vec<SelectedFile> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, entry)| !entry.session.loading && entry.last_used.elapsed() >= idle)
            .map(|(id, _)| id.clone())
            .collect();
        expired
            .iter()
            .filter_map(|id| sessions.remove(id))
            .filter_map(|entry| entry.session.file)
            .collect()
    }

    /// Periodically evicts idle sessions and deletes their stored copies.
    pub fn spawn_sweeper(&self, idle: Duration, upload_dir: PathBuf) {
        let state = self.clone();
        let period = (idle / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let released = state.evict_idle(idle).await;
                if released.is_empty() {
                    continue;
                }
                info!("Evicted idle sessions, removing {} stored copies", released.len());
                for file in &released {
                    discard_stored_copy(&upload_dir, file);
                }
            }
        });
    }
}
