use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::session::{Session, SessionId};

// SessionStore port trait and errors
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session store backend error: {0}")]
    Backend(String),
}

/// The session table. The session manager is the only caller; nothing else is
/// permitted to mutate `expires_at`. Backends must apply each call atomically
/// on the addressed record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError>;

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Persist a sliding-window extension of an existing record.
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Returns whether a record was actually removed.
    async fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError>;

    /// Drop every record with `expires_at` in the past; returns how many went.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionStoreError>;

    async fn count(&self) -> Result<usize, SessionStoreError>;
}
