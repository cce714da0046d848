//! Bounded session store with per-key serialization.
//!
//! Each session lives behind its own `tokio::Mutex`, which a workflow
//! operation holds for its full duration, including the suspension points
//! at collaborator calls. Two requests for the same session therefore run
//! one after the other; requests for different sessions never contend
//! beyond the dashmap shard lock.
//!
//! The store is bounded: at `max_sessions`, admitting a new session evicts
//! the least-recently-active one. The original system grew without bound
//! for the process lifetime; long-running deployments need the cap.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use mathq_core::SessionState;

use crate::metric_names;

/// Shared handle to one session's state.
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// In-memory session store keyed by opaque client-supplied ids.
pub struct SessionStore {
    entries: DashMap<String, SessionHandle>,
    max_sessions: usize,
}

impl SessionStore {
    /// Create a store holding at most `max_sessions` sessions.
    pub fn new(max_sessions: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_sessions: max_sessions.max(1),
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no sessions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the handle for `session_id`, creating a fresh session if absent.
    ///
    /// Id format is not validated; whatever string the client sent is the
    /// key. May evict the least-recently-active session to make room.
    pub fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if !self.entries.contains_key(session_id) && self.entries.len() >= self.max_sessions {
            self.evict_least_recent();
        }
        let handle = self
            .entries
            .entry(session_id.to_string())
            .or_insert_with(|| {
                debug!(session_id, "creating session");
                Arc::new(Mutex::new(SessionState::new(session_id)))
            })
            .clone();
        metrics::gauge!(metric_names::SESSIONS_ACTIVE).set(self.entries.len() as f64);
        handle
    }

    /// Get the handle for `session_id` without creating one.
    pub fn get(&self, session_id: &str) -> Option<SessionHandle> {
        self.entries.get(session_id).map(|e| e.clone())
    }

    /// Snapshot a session's state without creating one.
    pub async fn snapshot(&self, session_id: &str) -> Option<SessionState> {
        let handle = self.get(session_id)?;
        let guard = handle.lock().await;
        Some(guard.clone())
    }

    /// Evict the least-recently-active session.
    ///
    /// Sessions whose mutex is currently held are mid-operation and are
    /// never evicted; if every session is busy the store briefly exceeds
    /// its cap rather than pulling state out from under a running request.
    fn evict_least_recent(&self) {
        let mut oldest: Option<(String, DateTime<Utc>)> = None;
        for entry in &self.entries {
            let Ok(guard) = entry.value().try_lock() else {
                continue;
            };
            let last_active = guard.last_active;
            match &oldest {
                Some((_, ts)) if *ts <= last_active => {}
                _ => oldest = Some((entry.key().clone(), last_active)),
            }
        }

        if let Some((key, last_active)) = oldest {
            let _ = self.entries.remove(&key);
            metrics::counter!(metric_names::SESSIONS_EVICTED_TOTAL).increment(1);
            warn!(session_id = %key, %last_active, "evicted least-recently-active session");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mathq_core::Phase;

    #[tokio::test]
    async fn get_or_create_creates_once() {
        let store = SessionStore::new(10);
        let a = store.get_or_create("s1");
        let b = store.get_or_create("s1");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn get_does_not_create() {
        let store = SessionStore::new(10);
        assert!(store.get("missing").is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn snapshot_reflects_mutation() {
        let store = SessionStore::new(10);
        let handle = store.get_or_create("s1");
        {
            let mut guard = handle.lock().await;
            guard.original_question = Some("What is 2+2?".into());
            guard.advance_phase(Phase::Validated);
        }
        let snap = store.snapshot("s1").await.unwrap();
        assert_eq!(snap.original_question.as_deref(), Some("What is 2+2?"));
        assert_eq!(snap.phase, Phase::Validated);
    }

    #[tokio::test]
    async fn capacity_evicts_least_recently_active() {
        let store = SessionStore::new(2);
        let first = store.get_or_create("old");
        {
            // Backdate so ordering is unambiguous
            let mut guard = first.lock().await;
            guard.last_active = Utc::now() - chrono::Duration::minutes(5);
        }
        let _ = store.get_or_create("fresh");
        let _ = store.get_or_create("newcomer");

        assert_eq!(store.len(), 2);
        assert!(store.get("old").is_none());
        assert!(store.get("fresh").is_some());
        assert!(store.get("newcomer").is_some());
    }

    #[tokio::test]
    async fn busy_sessions_are_not_evicted() {
        let store = SessionStore::new(1);
        let busy = store.get_or_create("busy");
        let _guard = busy.lock().await;
        let _ = store.get_or_create("other");
        // "busy" was mid-operation, so the store went over cap instead
        assert!(store.get("busy").is_some());
        assert!(store.get("other").is_some());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn distinct_sessions_are_isolated() {
        let store = SessionStore::new(10);
        let a = store.get_or_create("a");
        {
            let mut guard = a.lock().await;
            guard.refined_question = Some("refined A".into());
        }
        let snap_b = store.snapshot("b").await;
        assert!(snap_b.is_none());
        let _ = store.get_or_create("b");
        let snap_b = store.snapshot("b").await.unwrap();
        assert!(snap_b.refined_question.is_none());
    }
}
