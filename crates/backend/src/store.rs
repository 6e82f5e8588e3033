use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::session::{Exchange, MAX_EXCHANGES_PER_SESSION};

/// Cap on live sessions; exceeding it triggers eviction of the
/// oldest-created sessions.
pub const MAX_SESSIONS: usize = 100;

struct Session {
    exchanges: Vec<Exchange>,
    // Monotonic creation sequence. Eviction is FIFO by creation, not LRU:
    // the source system drops the earliest-registered session regardless of
    // recent activity, and that behavior is kept and test-covered.
    created_seq: u64,
}

/// In-memory store mapping session ids to their exchange history.
///
/// All mutation goes through the single RwLock; reads hand back owned
/// copies so callers never hold the lock across an external service call.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    next_seq: AtomicU64,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            max_sessions,
        }
    }

    /// Resolve a request token to a live session, minting a fresh one when
    /// the token is absent or unknown. Returns the session id and whether it
    /// was newly created.
    pub async fn get_or_create(&self, request_token: Option<&str>) -> (String, bool) {
        let mut sessions = self.sessions.write().await;

        if let Some(token) = request_token {
            if sessions.contains_key(token) {
                return (token.to_string(), false);
            }
        }

        let id = generate_session_id();
        let created_seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        sessions.insert(
            id.clone(),
            Session {
                exchanges: Vec::new(),
                created_seq,
            },
        );
        tracing::info!(session_id = %id, "created new session");

        Self::enforce_capacity(&mut sessions, self.max_sessions);

        (id, true)
    }

    /// Append one exchange, front-trimming to the per-session cap.
    pub async fn append_exchange(
        &self,
        session_id: &str,
        user: impl Into<String>,
        reply: impl Into<String>,
    ) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            session.exchanges.push(Exchange::new(user, reply));
            if session.exchanges.len() > MAX_EXCHANGES_PER_SESSION {
                let excess = session.exchanges.len() - MAX_EXCHANGES_PER_SESSION;
                session.exchanges.drain(..excess);
            }
        }
    }

    /// The most recent `limit` exchanges in chronological order; empty for
    /// unknown sessions.
    pub async fn history(&self, session_id: &str, limit: usize) -> Vec<Exchange> {
        let sessions = self.sessions.read().await;
        match sessions.get(session_id) {
            Some(session) => {
                let skip = session.exchanges.len().saturating_sub(limit);
                session.exchanges[skip..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Reset a session's exchanges without removing the session itself.
    /// Returns false when the session is unknown.
    pub async fn clear(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.exchanges.clear();
                true
            }
            None => false,
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn total_exchanges(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.values().map(|s| s.exchanges.len()).sum()
    }

    fn enforce_capacity(sessions: &mut HashMap<String, Session>, max_sessions: usize) {
        while sessions.len() > max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, session)| session.created_seq)
                .map(|(id, _)| id.clone());

            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    tracing::info!(session_id = %id, "evicted oldest session at capacity");
                }
                None => break,
            }
        }
    }
}

fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}
