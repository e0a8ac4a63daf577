//! Browser sessions. A cookie carries the session id; the server keeps only a
//! pointer from each session to the latest results file it produced.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{header::COOKIE, HeaderMap};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "screener_session";

/// Sessions kept before the least recently updated one is evicted.
pub const DEFAULT_SESSION_CAPACITY: usize = 1024;

struct SessionEntry {
    path: PathBuf,
    /// Write sequence number; lower means updated earlier.
    updated_seq: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<Uuid, SessionEntry>,
    next_seq: u64,
}

#[derive(Clone)]
pub struct SessionStore {
    latest_results: Arc<RwLock<Sessions>>,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }
}

impl SessionStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            latest_results: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    /// Points the session at `path`. A new session arriving at capacity
    /// evicts the session updated longest ago.
    pub async fn set_latest_results(&self, session_id: Uuid, path: PathBuf) {
        let mut sessions = self.latest_results.write().await;
        if !sessions.entries.contains_key(&session_id) && sessions.entries.len() >= self.capacity {
            let oldest = sessions
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.updated_seq)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                sessions.entries.remove(&oldest);
                debug!("Evicted session {oldest}");
            }
        }
        let updated_seq = sessions.next_seq;
        sessions.next_seq += 1;
        sessions
            .entries
            .insert(session_id, SessionEntry { path, updated_seq });
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.latest_results.read().await.entries.len()
    }

    /// Latest results file for the session, if one was recorded and still exists on disk.
    pub async fn latest_results(&self, session_id: Uuid) -> Option<PathBuf> {
        let path = self
            .latest_results
            .read()
            .await
            .entries
            .get(&session_id)
            .map(|entry| entry.path.clone())?;
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }
}

/// Reads the session id from the request's `Cookie` headers.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session.
pub fn session_cookie(session_id: Uuid) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}
