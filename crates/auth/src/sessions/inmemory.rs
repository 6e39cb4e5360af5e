//! In-memory session storage for development and testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use boardsync_core::auth::{Result, SessionData, SessionId, SessionRepository};

/// In-memory session store.
///
/// Records live in a HashMap wrapped in `Arc<RwLock<_>>` together with
/// their absolute expiry; expired records read as absent. Data is not
/// persisted and is lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, (SessionData, DateTime<Utc>)>>>,
}

impl InMemorySessionStore {
    /// Creates a new empty in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn put_session(&self, id: &SessionId, data: &SessionData, ttl: Duration) -> Result<()> {
        let expires_at =
            Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.as_str().to_string(), (data.clone(), expires_at));
        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<SessionData>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(id.as_str())
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .map(|(data, _)| data.clone()))
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id.as_str());
        Ok(())
    }
}
