use std::sync::Arc;

use chrono::{DateTime, Utc};
use redis::{Commands, Connection};
use tokio::sync::RwLock;
use warden_core::{Session, SessionId, SessionStore, SessionStoreError};

/// Redis-backed session table for multi-instance deployments. Records are the
/// session model as JSON; the key TTL mirrors the session lifetime and is
/// re-armed on every sliding extension, so Redis evicts exactly what the
/// sweep would.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: Arc<RwLock<Connection>>,
}

impl RedisSessionStore {
    pub fn new(conn: Arc<RwLock<Connection>>) -> Self {
        Self { conn }
    }

    async fn put(&self, session: &Session) -> Result<(), SessionStoreError> {
        let key = get_key(&session.id);
        let ttl = (session.expires_at - session.last_activity_at)
            .num_seconds()
            .max(1) as u64;
        let payload = serde_json::to_string(session).map_err(backend)?;

        let mut conn = self.conn.write().await;
        conn.set_ex(key, payload, ttl).map_err(backend)
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        self.put(&session).await
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        let key = get_key(id);
        let mut conn = self.conn.write().await;
        let payload: Option<String> = conn.get(&key).map_err(backend)?;
        match payload {
            None => Ok(None),
            Some(payload) => serde_json::from_str(&payload).map(Some).map_err(backend),
        }
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.put(session).await
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        let key = get_key(id);
        let mut conn = self.conn.write().await;
        let removed: i64 = conn.del(&key).map_err(backend)?;
        Ok(removed > 0)
    }

    // Redis evicts by TTL on its own; the sweep has nothing to do here.
    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, SessionStoreError> {
        Ok(0)
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        let mut conn = self.conn.write().await;
        let keys: Vec<String> = {
            let iter = conn
                .scan_match(format!("{SESSION_KEY_PREFIX}*"))
                .map_err(backend)?;
            iter.collect::<Result<Vec<String>, _>>().map_err(backend)?
        };
        Ok(keys.len())
    }
}

// Key prefix prevents collisions with other tenants of the same instance.
const SESSION_KEY_PREFIX: &str = "session:";

fn get_key(id: &SessionId) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, id.as_str())
}

fn backend(e: impl std::fmt::Display) -> SessionStoreError {
    SessionStoreError::Backend(e.to_string())
}
