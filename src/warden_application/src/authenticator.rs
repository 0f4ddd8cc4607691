use std::sync::Arc;

use warden_core::{
    AuthOutcome, Clock, CredentialError, CredentialStore, FailureReason, LockReason, MfaToken,
    Password, PasswordPolicyEngine, PrincipalId, SecondFactorError, SecondFactorVerifier,
    SecurityEvent, SecurityEventSink, SessionStore,
};

use crate::lockout::LockoutTracker;
use crate::session_manager::{SessionError, SessionManager};

/// Error types specific to credential authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthenticatorError {
    #[error("Credential backend error: {0}")]
    Credential(String),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Second factor error: {0}")]
    SecondFactor(#[from] SecondFactorError),
}

/// Orchestrates lockout policy, the credential collaborator, the optional
/// second factor, and session issuance. The OTP gateway is the other path to
/// the same [`AuthOutcome`] shape.
pub struct CredentialAuthenticator<C, S>
where
    C: CredentialStore,
    S: SessionStore,
{
    credentials: C,
    lockout: Arc<LockoutTracker>,
    sessions: Arc<SessionManager<S>>,
    policy: PasswordPolicyEngine,
    second_factor: Option<Arc<dyn SecondFactorVerifier>>,
    events: Arc<dyn SecurityEventSink>,
    clock: Arc<dyn Clock>,
}

impl<C, S> CredentialAuthenticator<C, S>
where
    C: CredentialStore,
    S: SessionStore,
{
    pub fn new(
        credentials: C,
        lockout: Arc<LockoutTracker>,
        sessions: Arc<SessionManager<S>>,
        policy: PasswordPolicyEngine,
        events: Arc<dyn SecurityEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            lockout,
            sessions,
            policy,
            second_factor: None,
            events,
            clock,
        }
    }

    /// Wire an MFA verifier; without one, `mfa_enabled` principals log in on
    /// the first factor alone.
    pub fn with_second_factor(mut self, verifier: Arc<dyn SecondFactorVerifier>) -> Self {
        self.second_factor = Some(verifier);
        self
    }

    #[tracing::instrument(name = "CredentialAuthenticator::authenticate", skip_all)]
    pub async fn authenticate(
        &self,
        identifier: &PrincipalId,
        secret: &Password,
        origin_ip: &str,
        otp_code: Option<&str>,
    ) -> Result<AuthOutcome, AuthenticatorError> {
        let now = self.clock.now();

        if self.lockout.is_blocked(origin_ip) {
            return Ok(AuthOutcome::Locked {
                reason: LockReason::IpBlocked,
            });
        }
        if self.lockout.is_locked(origin_ip) {
            return Ok(AuthOutcome::Locked {
                reason: LockReason::AccountLocked,
            });
        }

        // Shape gate before the (possibly remote) credential check. Counts as
        // a failed attempt like any other mismatch.
        if !self.policy.meets_min_length(secret) {
            return Ok(self.register_failure(identifier, origin_ip, now, FailureReason::InvalidCredentials));
        }

        let record = match self.credentials.verify_credentials(identifier, secret).await {
            Ok(record) => record,
            // No-such-account and wrong-password take the identical path, so
            // callers cannot probe which identifiers exist.
            Err(CredentialError::UnknownPrincipal | CredentialError::SecretMismatch) => {
                return Ok(self.register_failure(
                    identifier,
                    origin_ip,
                    now,
                    FailureReason::InvalidCredentials,
                ));
            }
            Err(CredentialError::UnexpectedError(detail)) => {
                return Err(AuthenticatorError::Credential(detail));
            }
        };

        if record.mfa_enabled {
            if let Some(verifier) = &self.second_factor {
                let Some(code) = otp_code else {
                    return Ok(AuthOutcome::MfaRequired {
                        mfa_token: MfaToken::new(),
                    });
                };
                if !verifier.verify_code(&record.principal, code).await? {
                    return Ok(self.register_failure(
                        identifier,
                        origin_ip,
                        now,
                        FailureReason::InvalidOtp,
                    ));
                }
            }
        }

        self.lockout.record_success(origin_ip);
        let session = self
            .sessions
            .create_session(record.principal.clone(), origin_ip)
            .await?;
        self.events.emit(SecurityEvent::AuthSuccess {
            principal: record.principal.to_string(),
            origin_ip: origin_ip.to_string(),
            timestamp: now,
        });
        Ok(AuthOutcome::Success { session })
    }

    fn register_failure(
        &self,
        identifier: &PrincipalId,
        origin_ip: &str,
        now: chrono::DateTime<chrono::Utc>,
        reason: FailureReason,
    ) -> AuthOutcome {
        let decision = self.lockout.record_failure(origin_ip);
        self.events.emit(SecurityEvent::AuthFailure {
            identifier: identifier.to_string(),
            origin_ip: origin_ip.to_string(),
            timestamp: now,
        });
        AuthOutcome::Failure {
            reason,
            attempts_remaining: decision.attempts_remaining,
        }
    }
}
