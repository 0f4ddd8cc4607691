use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use warden_core::{
    CredentialError, CredentialRecord, CredentialStore, ManualClock, Password, PrincipalId,
    SecondFactorError, SecondFactorVerifier, SecurityEvent, SecurityEventSink, Session, SessionId,
    SessionStore, SessionStoreError,
};

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::starting_at(Utc::now()))
}

/// Captures emitted events for assertions.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<SecurityEvent>>,
}

impl CollectingSink {
    pub fn names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(SecurityEvent::name)
            .collect()
    }
}

impl SecurityEventSink for CollectingSink {
    fn emit(&self, event: SecurityEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Plain map-backed session store for component tests.
#[derive(Default, Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, Session>>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionStoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        Ok(self.sessions.lock().unwrap().get(id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.lock().unwrap().remove(id).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, SessionStoreError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - sessions.len())
    }

    async fn count(&self) -> Result<usize, SessionStoreError> {
        Ok(self.sessions.lock().unwrap().len())
    }
}

/// Single-user credential collaborator with plain comparison; argon2 lives in
/// the adapters crate and is not what these tests exercise.
#[derive(Clone)]
pub struct MemoryCredentialStore {
    pub principal: &'static str,
    pub secret: &'static str,
    pub mfa_enabled: bool,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn verify_credentials(
        &self,
        identifier: &PrincipalId,
        secret: &Password,
    ) -> Result<CredentialRecord, CredentialError> {
        use secrecy::ExposeSecret;
        if identifier.as_str() != self.principal {
            return Err(CredentialError::UnknownPrincipal);
        }
        if secret.as_ref().expose_secret() != self.secret {
            return Err(CredentialError::SecretMismatch);
        }
        Ok(CredentialRecord {
            principal: identifier.clone(),
            mfa_enabled: self.mfa_enabled,
        })
    }
}

/// Second factor that accepts one hardcoded code.
pub struct StaticSecondFactor {
    pub accepted_code: &'static str,
}

#[async_trait]
impl SecondFactorVerifier for StaticSecondFactor {
    async fn verify_code(
        &self,
        _principal: &PrincipalId,
        code: &str,
    ) -> Result<bool, SecondFactorError> {
        Ok(code == self.accepted_code)
    }
}
