use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use warden_core::{Session, SessionId, SessionStore, SessionStoreError};

/// Process-local session table; the default store for single-instance
/// deployments. Sharded map, so per-key operations only contend within a
/// shard.
#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.get(id).map(|session| session.value().clone()))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.remove(id).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionStoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - self.sessions.len())
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::PrincipalId;

    fn session(tag: &str, expires_at: DateTime<Utc>) -> Session {
        let now = Utc::now();
        Session {
            id: SessionId::from(tag),
            principal: PrincipalId::new("user-1").unwrap(),
            origin_ip: "10.0.0.5".to_string(),
            created_at: now,
            last_activity_at: now,
            expires_at,
        }
    }

    #[tokio::test]
    async fn insert_get_remove_round_trip() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        let record = session("a", now + chrono::Duration::hours(1));
        store.insert(record.clone()).await.unwrap();
        assert_eq!(store.get(&record.id).await.unwrap(), Some(record.clone()));
        assert!(store.remove(&record.id).await.unwrap());
        assert_eq!(store.get(&record.id).await.unwrap(), None);
        assert!(!store.remove(&record.id).await.unwrap());
    }

    #[tokio::test]
    async fn purge_only_touches_expired_records() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        store
            .insert(session("stale", now - chrono::Duration::minutes(1)))
            .await
            .unwrap();
        store
            .insert(session("fresh", now + chrono::Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.get(&SessionId::from("fresh")).await.unwrap().is_some());
    }
}
