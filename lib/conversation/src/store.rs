//! In-memory session store.
//!
//! Holds one session per user for the lifetime of the process. Each session
//! sits behind its own lock so that handling one event for a user excludes
//! any other handling for that user, while different users never contend
//! beyond the brief map lookup.

use crate::session::ConversationSession;
use market_relay_core::UserId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type SessionSlot = Arc<Mutex<ConversationSession>>;

/// Process-wide map from user to conversation session.
///
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, SessionSlot>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn slot(&self, user_id: UserId) -> SessionSlot {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(ConversationSession::new(user_id))))
            .clone()
    }

    /// Takes exclusive access to a user's session, creating an idle one if
    /// absent.
    ///
    /// The guard is meant to be held for the handling of a single event and
    /// released before any network call.
    pub async fn lock(&self, user_id: UserId) -> OwnedMutexGuard<ConversationSession> {
        self.slot(user_id).await.lock_owned().await
    }

    /// Returns a snapshot of a user's session, creating an idle one if absent.
    pub async fn get(&self, user_id: UserId) -> ConversationSession {
        self.lock(user_id).await.clone()
    }

    /// Replaces a user's session.
    pub async fn set(&self, user_id: UserId, session: ConversationSession) {
        *self.lock(user_id).await = session;
    }

    /// Resets a user's session to idle with nothing collected.
    pub async fn remove(&self, user_id: UserId) {
        let slot = self.sessions.lock().await.get(&user_id).cloned();
        if let Some(slot) = slot {
            slot.lock().await.reset();
        }
    }

    /// Returns the number of users with a session.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Returns true if no user has a session.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}
