//! In-memory session storage with TTL and capacity eviction.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex as StdMutex},
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::base::{catalog::Indication, config::Config, types::ChatMessage};

/// A single intake conversation.
///
/// All mutation flows through the dialogue orchestrator while holding the
/// per-session lock, so turns within one session are serialized.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    /// Append-only transcript; ends with the newest turn.
    pub transcript: Vec<ChatMessage>,
    /// Authoritative collected indications; unanswered ones are absent.
    pub collected: BTreeMap<Indication, bool>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    fn new(id: String) -> Self {
        Self {
            id,
            transcript: Vec::new(),
            collected: BTreeMap::new(),
            created_at: chrono::Utc::now(),
        }
    }

    /// First catalog-order indication not yet collected.
    pub fn next_unanswered(&self) -> Option<Indication> {
        Indication::ALL.iter().copied().find(|indication| !self.collected.contains_key(indication))
    }

    /// Questions still open, in catalog order. Shrinks monotonically as
    /// answers come in.
    pub fn remaining_questions(&self) -> Vec<&'static str> {
        Indication::ALL.iter().copied().filter(|indication| !self.collected.contains_key(indication)).map(Indication::question).collect()
    }
}

/// Shared handle to one session; the inner lock serializes turns.
pub type SessionHandle = Arc<Mutex<Session>>;

struct Entry {
    session: SessionHandle,
    last_active: Instant,
}

/// Session store for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    sessions: StdMutex<HashMap<String, Entry>>,
    ttl: Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(config: &Config) -> Self {
        Self::with_bounds(Duration::from_secs(config.session_ttl_secs), config.max_sessions)
    }

    pub fn with_bounds(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                sessions: StdMutex::new(HashMap::new()),
                ttl,
                max_sessions,
            }),
        }
    }

    /// Allocate a fresh session under a cryptographically random id.
    #[instrument(skip_all)]
    pub fn create(&self) -> (String, SessionHandle) {
        let mut sessions = self.inner.sessions.lock().expect("session store mutex poisoned");

        Self::evict_expired(&mut sessions, self.inner.ttl);

        // At capacity, the least-recently-active session makes room.
        if sessions.len() >= self.inner.max_sessions
            && let Some(oldest) = sessions.iter().min_by_key(|(_, entry)| entry.last_active).map(|(id, _)| id.clone())
        {
            sessions.remove(&oldest);
            debug!("Evicted session `{}` to stay within capacity.", oldest);
        }

        let id = Uuid::new_v4().to_string();
        let handle = Arc::new(Mutex::new(Session::new(id.clone())));

        sessions.insert(
            id.clone(),
            Entry {
                session: handle.clone(),
                last_active: Instant::now(),
            },
        );

        info!("Session `{}` created ({} active).", id, sessions.len());

        (id, handle)
    }

    /// Look up a live session, refreshing its TTL.
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.inner.sessions.lock().expect("session store mutex poisoned");

        Self::evict_expired(&mut sessions, self.inner.ttl);

        let entry = sessions.get_mut(id)?;
        entry.last_active = Instant::now();

        Some(entry.session.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.sessions.lock().expect("session store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_expired(sessions: &mut HashMap<String, Entry>, ttl: Duration) {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_active.elapsed() < ttl);

        if sessions.len() < before {
            debug!("Evicted {} expired sessions.", before - sessions.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_returns_the_same_session() {
        let store = SessionStore::with_bounds(Duration::from_secs(60), 16);

        let (id, handle) = store.create();

        assert!(store.get(&id).is_some());
        assert!(Arc::ptr_eq(&handle, &store.get(&id).unwrap()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_id_returns_none() {
        let store = SessionStore::with_bounds(Duration::from_secs(60), 16);

        assert!(store.get("nope").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn session_ids_are_unique() {
        let store = SessionStore::with_bounds(Duration::from_secs(60), 16);

        let (a, _) = store.create();
        let (b, _) = store.create();

        assert_ne!(a, b);
    }

    #[test]
    fn expired_sessions_are_evicted_on_access() {
        let store = SessionStore::with_bounds(Duration::ZERO, 16);

        let (id, _) = store.create();

        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn capacity_evicts_the_least_recently_active_session() {
        let store = SessionStore::with_bounds(Duration::from_secs(60), 2);

        let (first, _) = store.create();
        std::thread::sleep(Duration::from_millis(5));
        let (second, _) = store.create();
        std::thread::sleep(Duration::from_millis(5));
        let (third, _) = store.create();

        assert_eq!(store.len(), 2);
        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
    }

    #[test]
    fn remaining_questions_shrink_as_indications_arrive() {
        let mut session = Session::new("test".to_string());

        assert_eq!(session.remaining_questions().len(), 9);
        assert_eq!(session.next_unanswered(), Some(Indication::OrientationDifficulty));

        session.collected.insert(Indication::OrientationDifficulty, true);
        session.collected.insert(Indication::FallRisk, false);

        assert_eq!(session.remaining_questions().len(), 7);
        assert_eq!(session.next_unanswered(), Some(Indication::NightWandering));
    }
}
