//! Redis session storage implementation.

use async_trait::async_trait;
use boardsync_core::auth::{AuthError, Result, SessionData, SessionId, SessionRepository};
use fred::prelude::*;
use std::time::Duration;

/// Redis-backed session storage.
///
/// Records are JSON blobs under `sess:<id>` with a per-write TTL, so
/// passive expiry happens server-side in Redis.
pub struct RedisSessionStore {
    pool: Pool,
}

impl RedisSessionStore {
    /// Creates a new Redis session store from an initialized pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn session_key(id: &SessionId) -> String {
        format!("sess:{id}")
    }
}

#[async_trait]
impl SessionRepository for RedisSessionStore {
    async fn put_session(&self, id: &SessionId, data: &SessionData, ttl: Duration) -> Result<()> {
        let key = Self::session_key(id);
        let value = serde_json::to_string(data).map_err(|e| AuthError::Storage(e.to_string()))?;

        let ttl_secs = ttl.as_secs() as i64;

        self.pool
            .set::<(), _, _>(&key, &value, Some(Expiration::EX(ttl_secs)), None, false)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn get_session(&self, id: &SessionId) -> Result<Option<SessionData>> {
        let key = Self::session_key(id);
        let value: Option<String> = self
            .pool
            .get(&key)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        match value {
            Some(json) => {
                let data: SessionData =
                    serde_json::from_str(&json).map_err(|e| AuthError::Storage(e.to_string()))?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn delete_session(&self, id: &SessionId) -> Result<()> {
        let key = Self::session_key(id);
        self.pool
            .del::<(), _>(&key)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        Ok(())
    }
}
