use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use warden_core::{
    AuthOutcome, ChallengeId, ChannelKind, Clock, DeliveryChannel, DeliveryStatus, Destination,
    DestinationError, FailureReason, LockReason, OtpChallenge, OtpCode, OtpCodeError, OtpMessage,
    PrincipalId, SecondFactorError, SecondFactorVerifier, SecurityConfig, SecurityEvent,
    SecurityEventSink, SessionStore, chrono_span,
};

use crate::lockout::LockoutTracker;
use crate::session_manager::{SessionError, SessionManager};

/// Error types specific to issuing a challenge
#[derive(Debug, thiserror::Error)]
pub enum OtpInitiateError {
    #[error("Identifier is cooling down")]
    CoolingDown,
    #[error("Too many code requests; retry later")]
    RateLimited,
    #[error("Channel quota exhausted")]
    ChannelQuotaExceeded,
    #[error(transparent)]
    Destination(#[from] DestinationError),
    #[error(transparent)]
    Code(#[from] OtpCodeError),
    /// Provider detail stays in the logs; callers only ever see this text.
    #[error("Could not send code")]
    DeliveryFailed,
}

/// Error types specific to verifying a challenge
#[derive(Debug, thiserror::Error)]
pub enum OtpVerifyError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

/// Response to a successful `initiate`. Only the masked destination ever
/// leaves the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpIssue {
    pub challenge_id: ChallengeId,
    pub masked_destination: String,
    pub expires_in_seconds: u64,
}

enum ChallengeCheck {
    NotFound,
    CoolingDown,
    Expired { challenge: OtpChallenge },
    AttemptsExceeded { challenge: OtpChallenge },
    Mismatch { challenge: OtpChallenge, attempts_remaining: u32 },
    Accepted { challenge: OtpChallenge },
}

/// Issues and verifies one-time passcodes across delivery channels. Owns the
/// challenge table and the per-identifier request window; attempt cooldowns
/// go through the shared [`LockoutTracker`].
pub struct OtpChannelGateway<S>
where
    S: SessionStore,
{
    challenges: DashMap<ChallengeId, OtpChallenge>,
    request_windows: DashMap<String, Vec<(DateTime<Utc>, ChannelKind)>>,
    delivery: Arc<dyn DeliveryChannel>,
    lockout: Arc<LockoutTracker>,
    sessions: Arc<SessionManager<S>>,
    events: Arc<dyn SecurityEventSink>,
    config: Arc<SecurityConfig>,
    clock: Arc<dyn Clock>,
}

impl<S> OtpChannelGateway<S>
where
    S: SessionStore,
{
    pub fn new(
        delivery: Arc<dyn DeliveryChannel>,
        lockout: Arc<LockoutTracker>,
        sessions: Arc<SessionManager<S>>,
        events: Arc<dyn SecurityEventSink>,
        config: Arc<SecurityConfig>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            challenges: DashMap::new(),
            request_windows: DashMap::new(),
            delivery,
            lockout,
            sessions,
            events,
            config,
            clock,
        }
    }

    #[tracing::instrument(name = "OtpChannelGateway::initiate", skip_all, fields(channel = %channel))]
    pub async fn initiate(
        &self,
        principal: PrincipalId,
        channel: ChannelKind,
        destination: &str,
    ) -> Result<OtpIssue, OtpInitiateError> {
        let now = self.clock.now();
        if self.lockout.is_locked(principal.as_str()) {
            return Err(OtpInitiateError::CoolingDown);
        }
        let destination = Destination::parse(channel, destination)?;
        self.check_request_budget(&principal, channel, now)?;

        let code = OtpCode::generate(self.config.otp_length)?;
        let minutes = (self.config.otp_expiry.as_secs() / 60).max(1);
        let challenge = OtpChallenge {
            id: ChallengeId::new(),
            principal: principal.clone(),
            channel,
            destination: destination.clone(),
            code: code.clone(),
            created_at: now,
            expires_at: now + chrono_span(self.config.otp_expiry),
            verified: false,
            attempts: 0,
        };
        let challenge_id = challenge.id.clone();
        let masked = destination.masked();
        self.challenges.insert(challenge_id.clone(), challenge);

        // No table lock is held across the provider await.
        let payload = OtpMessage {
            message: format!(
                "Your verification code is {}. It expires in {minutes} minutes.",
                code.as_str()
            ),
            code,
        };
        match self.delivery.send(channel, &destination, &payload).await {
            Ok(receipt) if receipt.status == DeliveryStatus::Sent => {
                tracing::info!(
                    challenge = %challenge_id,
                    destination = %masked,
                    provider_ref = ?receipt.provider_ref,
                    "one-time code dispatched"
                );
            }
            Ok(receipt) => {
                // An undeliverable challenge must not linger as pending state.
                self.challenges.remove(&challenge_id);
                tracing::warn!(destination = %masked, status = ?receipt.status, "provider refused the code");
                return Err(OtpInitiateError::DeliveryFailed);
            }
            Err(error) => {
                self.challenges.remove(&challenge_id);
                tracing::warn!(destination = %masked, %error, "code dispatch failed");
                return Err(OtpInitiateError::DeliveryFailed);
            }
        }

        self.note_request(&principal, channel, now);
        self.events.emit(SecurityEvent::OtpSent {
            masked_destination: masked.clone(),
            channel,
            timestamp: now,
        });
        Ok(OtpIssue {
            challenge_id,
            masked_destination: masked,
            expires_in_seconds: self.config.otp_expiry.as_secs(),
        })
    }

    #[tracing::instrument(name = "OtpChannelGateway::verify", skip_all)]
    pub async fn verify(
        &self,
        challenge_id: &ChallengeId,
        code: &str,
        origin_ip: &str,
    ) -> Result<AuthOutcome, OtpVerifyError> {
        let now = self.clock.now();
        match self.check_challenge(challenge_id, code, now) {
            ChallengeCheck::NotFound => Ok(AuthOutcome::Failure {
                reason: FailureReason::ChallengeNotFound,
                attempts_remaining: 0,
            }),
            ChallengeCheck::CoolingDown => Ok(AuthOutcome::Locked {
                reason: LockReason::OtpCooldown,
            }),
            ChallengeCheck::Expired { challenge } => {
                self.emit_failure(&challenge, "expired", now);
                Ok(AuthOutcome::Failure {
                    reason: FailureReason::OtpExpired,
                    attempts_remaining: 0,
                })
            }
            ChallengeCheck::AttemptsExceeded { challenge } => {
                self.lockout
                    .impose_cooldown(challenge.principal.as_str(), self.config.otp_cooldown);
                self.emit_failure(&challenge, "attempts-exceeded", now);
                Ok(AuthOutcome::Failure {
                    reason: FailureReason::OtpAttemptsExceeded,
                    attempts_remaining: 0,
                })
            }
            ChallengeCheck::Mismatch {
                challenge,
                attempts_remaining,
            } => {
                self.emit_failure(&challenge, "invalid-code", now);
                Ok(AuthOutcome::Failure {
                    reason: FailureReason::InvalidOtp,
                    attempts_remaining,
                })
            }
            ChallengeCheck::Accepted { challenge } => {
                self.lockout.record_success(challenge.principal.as_str());
                let session = self
                    .sessions
                    .create_session(challenge.principal.clone(), origin_ip)
                    .await?;
                self.events.emit(SecurityEvent::OtpVerified {
                    principal: challenge.principal.to_string(),
                    channel: challenge.channel,
                    timestamp: now,
                });
                Ok(AuthOutcome::Success { session })
            }
        }
    }

    /// Drops expired challenges and stale window entries. Scheduled by the
    /// embedder alongside the session sweep; expiry is also checked lazily on
    /// every verify, so this only bounds memory.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.challenges.len();
        self.challenges
            .retain(|_, challenge| !challenge.is_expired(now));
        let cutoff = now - chrono_span(self.config.otp_request_window);
        self.request_windows.retain(|_, entries| {
            entries.retain(|(at, _)| *at > cutoff);
            !entries.is_empty()
        });
        before - self.challenges.len()
    }

    pub fn pending_challenges(&self) -> usize {
        self.challenges.len()
    }

    /// Single keyed read-modify-write over one challenge. Expiry wins over
    /// attempt accounting; exceeding the attempt budget removes the record.
    fn check_challenge(
        &self,
        challenge_id: &ChallengeId,
        code: &str,
        now: DateTime<Utc>,
    ) -> ChallengeCheck {
        let Entry::Occupied(mut occupied) = self.challenges.entry(challenge_id.clone()) else {
            return ChallengeCheck::NotFound;
        };
        if occupied.get().is_expired(now) {
            return ChallengeCheck::Expired {
                challenge: occupied.remove(),
            };
        }
        if self.lockout.is_locked(occupied.get().principal.as_str()) {
            return ChallengeCheck::CoolingDown;
        }

        let record = occupied.get_mut();
        record.attempts += 1;
        if record.attempts > self.config.otp_max_attempts {
            return ChallengeCheck::AttemptsExceeded {
                challenge: occupied.remove(),
            };
        }
        if record.code.matches(code.trim()) {
            record.verified = true;
            return ChallengeCheck::Accepted {
                challenge: occupied.remove(),
            };
        }
        let attempts_remaining = self.config.otp_max_attempts.saturating_sub(record.attempts);
        ChallengeCheck::Mismatch {
            challenge: record.clone(),
            attempts_remaining,
        }
    }

    fn check_request_budget(
        &self,
        principal: &PrincipalId,
        channel: ChannelKind,
        now: DateTime<Utc>,
    ) -> Result<(), OtpInitiateError> {
        let Some(entry) = self.request_windows.get(principal.as_str()) else {
            return Ok(());
        };
        let cutoff = now - chrono_span(self.config.otp_request_window);
        let total = entry.iter().filter(|(at, _)| *at > cutoff).count() as u32;
        if total >= self.config.otp_requests_per_window {
            return Err(OtpInitiateError::RateLimited);
        }
        let on_channel = entry
            .iter()
            .filter(|(at, ch)| *at > cutoff && *ch == channel)
            .count() as u32;
        if on_channel >= self.config.channel_quotas.for_channel(channel) {
            return Err(OtpInitiateError::ChannelQuotaExceeded);
        }
        Ok(())
    }

    fn note_request(&self, principal: &PrincipalId, channel: ChannelKind, now: DateTime<Utc>) {
        let cutoff = now - chrono_span(self.config.otp_request_window);
        let mut entry = self
            .request_windows
            .entry(principal.as_str().to_string())
            .or_default();
        entry.retain(|(at, _)| *at > cutoff);
        entry.push((now, channel));
    }

    fn emit_failure(&self, challenge: &OtpChallenge, reason: &str, now: DateTime<Utc>) {
        self.events.emit(SecurityEvent::OtpFailed {
            masked_destination: challenge.destination.masked(),
            channel: challenge.channel,
            reason: reason.to_string(),
            timestamp: now,
        });
    }
}

/// Second-factor hook for the credential path: consumes the caller's live
/// challenge with the same expiry/attempt/cooldown rules as `verify`, but
/// issues no session of its own.
#[async_trait::async_trait]
impl<S> SecondFactorVerifier for OtpChannelGateway<S>
where
    S: SessionStore,
{
    async fn verify_code(
        &self,
        principal: &PrincipalId,
        code: &str,
    ) -> Result<bool, SecondFactorError> {
        let now = self.clock.now();
        let challenge_id = self
            .challenges
            .iter()
            .find(|entry| entry.principal == *principal)
            .map(|entry| entry.id.clone());
        let Some(challenge_id) = challenge_id else {
            return Ok(false);
        };
        match self.check_challenge(&challenge_id, code, now) {
            ChallengeCheck::Accepted { challenge } => {
                self.lockout.record_success(challenge.principal.as_str());
                Ok(true)
            }
            ChallengeCheck::AttemptsExceeded { challenge } => {
                self.lockout
                    .impose_cooldown(challenge.principal.as_str(), self.config.otp_cooldown);
                self.emit_failure(&challenge, "attempts-exceeded", now);
                Ok(false)
            }
            ChallengeCheck::Expired { challenge } => {
                self.emit_failure(&challenge, "expired", now);
                Ok(false)
            }
            ChallengeCheck::Mismatch { challenge, .. } => {
                self.emit_failure(&challenge, "invalid-code", now);
                Ok(false)
            }
            ChallengeCheck::NotFound | ChallengeCheck::CoolingDown => Ok(false),
        }
    }
}
