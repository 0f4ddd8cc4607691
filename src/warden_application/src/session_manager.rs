use std::sync::Arc;

use tokio::task::JoinHandle;
use warden_core::{
    Clock, PrincipalId, SecurityConfig, Session, SessionId, SessionIdError, SessionStore,
    SessionStoreError, SessionValidation, chrono_span,
};

/// Error types specific to session management
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session store error: {0}")]
    Store(#[from] SessionStoreError),
    #[error("Could not mint session token: {0}")]
    Token(#[from] SessionIdError),
}

/// Owns the session table: creation, sliding-window validation, termination,
/// and the periodic expiry sweep.
pub struct SessionManager<S>
where
    S: SessionStore,
{
    store: S,
    config: Arc<SecurityConfig>,
    clock: Arc<dyn Clock>,
}

impl<S> SessionManager<S>
where
    S: SessionStore,
{
    pub fn new(store: S, config: Arc<SecurityConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    #[tracing::instrument(name = "SessionManager::create_session", skip_all)]
    pub async fn create_session(
        &self,
        principal: PrincipalId,
        origin_ip: &str,
    ) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let session = Session {
            id: SessionId::generate()?,
            principal,
            origin_ip: origin_ip.to_string(),
            created_at: now,
            last_activity_at: now,
            expires_at: now + chrono_span(self.config.session_timeout),
        };
        self.store.insert(session.clone()).await?;
        Ok(session)
    }

    /// Sliding window: every successful validation pushes `expires_at` a full
    /// timeout into the future. An expired record is evicted as a side effect.
    #[tracing::instrument(name = "SessionManager::validate_session", skip_all)]
    pub async fn validate_session(
        &self,
        id: &SessionId,
    ) -> Result<SessionValidation, SessionError> {
        let now = self.clock.now();
        let Some(mut session) = self.store.get(id).await? else {
            return Ok(SessionValidation::NotFound);
        };
        if session.is_expired(now) {
            self.store.remove(id).await?;
            return Ok(SessionValidation::Expired);
        }
        session.last_activity_at = now;
        session.expires_at = now + chrono_span(self.config.session_timeout);
        self.store.save(&session).await?;
        Ok(SessionValidation::Valid(session))
    }

    /// Returns whether a live session was actually terminated.
    pub async fn terminate_session(&self, id: &SessionId) -> Result<bool, SessionError> {
        Ok(self.store.remove(id).await?)
    }

    /// One sweep pass; the background task calls this on an interval, bounding
    /// memory growth from sessions that are never validated again.
    pub async fn sweep_expired(&self) -> Result<usize, SessionError> {
        let removed = self.store.purge_expired(self.clock.now()).await?;
        if removed > 0 {
            tracing::debug!(removed, "swept expired sessions");
        }
        Ok(removed)
    }

    pub async fn active_sessions(&self) -> Result<usize, SessionError> {
        Ok(self.store.count().await?)
    }
}

impl<S> SessionManager<S>
where
    S: SessionStore + 'static,
{
    /// Spawns the periodic sweep; keep the handle to abort on shutdown.
    pub fn spawn_sweeper(self: Arc<Self>) -> JoinHandle<()> {
        let manager = self;
        let period = manager.config.session_sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = manager.sweep_expired().await {
                    tracing::warn!(%error, "session sweep failed");
                }
            }
        })
    }
}
