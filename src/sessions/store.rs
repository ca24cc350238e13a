//! Session store — in-memory sessions keyed by UUID with idle expiry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::SessionError;
use crate::report::ComposedReport;
use crate::survey::{ScoringMode, SessionState};

/// One user's session. Guarded by its own mutex so actions within a
/// session run one at a time.
#[derive(Debug)]
pub struct SessionEntry {
    pub id: Uuid,
    pub state: SessionState,
    /// Set together with the move to the report page.
    pub report: Option<Arc<ComposedReport>>,
    last_active: DateTime<Utc>,
}

impl SessionEntry {
    fn new(id: Uuid, scoring: ScoringMode) -> Self {
        Self {
            id,
            state: SessionState::new(scoring),
            report: None,
            last_active: Utc::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}

pub type SessionHandle = Arc<Mutex<SessionEntry>>;

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    scoring: ScoringMode,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(scoring: ScoringMode, idle_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
            scoring,
            idle_timeout,
        })
    }

    /// Start a fresh session on the intake page.
    pub async fn create(&self) -> SessionHandle {
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(SessionEntry::new(id, self.scoring)));
        self.sessions.write().await.insert(id, Arc::clone(&handle));
        info!(session_id = %id, scoring = ?self.scoring, "Session started");
        handle
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Drop sessions idle since before `now - idle_timeout`. Sessions whose
    /// lock is held are in use and kept.
    pub async fn prune_idle_at(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.idle_timeout;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, handle| match handle.try_lock() {
            Ok(entry) => {
                let keep = entry.last_active >= cutoff;
                if !keep {
                    debug!(session_id = %id, "Session expired");
                }
                keep
            }
            Err(_) => true,
        });
        let pruned = before - sessions.len();
        if pruned > 0 {
            info!(pruned, remaining = sessions.len(), "Expired idle sessions");
        }
        pruned
    }

    pub async fn prune_idle(&self) -> usize {
        self.prune_idle_at(Utc::now()).await
    }
}

/// Spawn a background task that sweeps idle sessions every 60 seconds.
pub fn spawn_expiry_task(store: Arc<SessionStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            store.prune_idle().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::Page;

    fn store() -> Arc<SessionStore> {
        SessionStore::new(ScoringMode::Recompute, Duration::minutes(30))
    }

    async fn count(store: &SessionStore) -> usize {
        store.sessions.read().await.len()
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = store();
        assert_eq!(count(&store).await, 0);

        let handle = store.create().await;
        let id = handle.lock().await.id;
        assert_eq!(count(&store).await, 1);

        let fetched = store.get(id).await.unwrap();
        let entry = fetched.lock().await;
        assert_eq!(entry.state.page(), Page::Intake);
        assert!(entry.report.is_none());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = store();
        let id = Uuid::new_v4();
        assert!(matches!(store.get(id).await, Err(SessionError::NotFound(x)) if x == id));
    }

    #[tokio::test]
    async fn sessions_inherit_scoring_mode() {
        let store = SessionStore::new(ScoringMode::Accumulate, Duration::minutes(5));
        let handle = store.create().await;
        assert_eq!(handle.lock().await.state.scoring(), ScoringMode::Accumulate);
    }

    #[tokio::test]
    async fn prune_drops_only_idle_sessions() {
        let store = store();
        let old = store.create().await;
        let fresh = store.create().await;
        old.lock().await.last_active = Utc::now() - Duration::minutes(31);

        let pruned = store.prune_idle_at(Utc::now()).await;
        assert_eq!(pruned, 1);
        assert_eq!(count(&store).await, 1);

        let fresh_id = fresh.lock().await.id;
        assert!(store.get(fresh_id).await.is_ok());
    }

    #[tokio::test]
    async fn locked_sessions_survive_prune() {
        let store = store();
        let handle = store.create().await;
        let mut guard = handle.lock().await;
        guard.last_active = Utc::now() - Duration::hours(5);

        assert_eq!(store.prune_idle_at(Utc::now()).await, 0);
        drop(guard);
        assert_eq!(store.prune_idle_at(Utc::now()).await, 1);
    }

    #[tokio::test]
    async fn touch_refreshes_activity() {
        let store = store();
        let handle = store.create().await;
        {
            let mut entry = handle.lock().await;
            entry.last_active = Utc::now() - Duration::hours(1);
            entry.touch();
        }
        assert_eq!(store.prune_idle().await, 0);
    }
}
