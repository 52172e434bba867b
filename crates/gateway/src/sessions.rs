//! Per-session credential binding for the multi-tenant HTTP mode.
//!
//! The store maps session IDs to the credential supplied at session
//! initiation.  It is owned by the protocol shell and read per call;
//! the core never touches it.  Entries are in-memory only; credentials
//! are never written to disk.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// One bound session.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub session_id: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe session-id → credential store.
#[derive(Default)]
pub struct CredentialStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `token` to a freshly minted session ID.
    pub fn bind(&self, token: impl Into<String>) -> SessionEntry {
        let entry = SessionEntry {
            session_id: uuid::Uuid::new_v4().to_string(),
            token: token.into(),
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .insert(entry.session_id.clone(), entry.clone());

        tracing::info!(session_id = %entry.session_id, "session credential bound");
        entry
    }

    /// Look up the credential bound to `session_id`.
    pub fn token(&self, session_id: &str) -> Option<String> {
        self.sessions
            .read()
            .get(session_id)
            .map(|e| e.token.clone())
    }

    /// Discard a session and its credential.  Returns whether it existed.
    pub fn discard(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().remove(session_id).is_some();
        if removed {
            tracing::info!(session_id = %session_id, "session discarded");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
