use serde::Serialize;
use uuid::Uuid;

use crate::domain::session::Session;

/// Correlation token handed back when a second factor is still outstanding.
/// The caller routes it to the OTP gateway; it never grants access by itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MfaToken(Uuid);

impl MfaToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MfaToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MfaToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Why an attempt was denied without the identifier being locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    InvalidCredentials,
    InvalidOtp,
    OtpExpired,
    OtpAttemptsExceeded,
    ChallengeNotFound,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid-credentials",
            Self::InvalidOtp => "invalid-otp",
            Self::OtpExpired => "otp-expired",
            Self::OtpAttemptsExceeded => "otp-attempts-exceeded",
            Self::ChallengeNotFound => "challenge-not-found",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an attempt was refused outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockReason {
    IpBlocked,
    AccountLocked,
    OtpCooldown,
}

impl LockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IpBlocked => "ip-blocked",
            Self::AccountLocked => "account-locked",
            Self::OtpCooldown => "otp-cooldown",
        }
    }
}

impl std::fmt::Display for LockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an authentication attempt; the credential and OTP paths share
/// this shape and converge on the same session type.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Success {
        session: Session,
    },
    MfaRequired {
        mfa_token: MfaToken,
    },
    Failure {
        reason: FailureReason,
        attempts_remaining: u32,
    },
    Locked {
        reason: LockReason,
    },
}

impl AuthOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
