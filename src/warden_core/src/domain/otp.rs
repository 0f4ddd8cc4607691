use chrono::{DateTime, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::channel::ChannelKind;
use crate::domain::destination::Destination;
use crate::domain::principal::PrincipalId;

#[derive(Debug, Error)]
pub enum OtpCodeError {
    #[error("Code must be exactly {expected} decimal digits")]
    WrongShape { expected: usize },
    #[error("Could not draw secure random digits: {0}")]
    Rng(String),
}

/// A fixed-length decimal one-time passcode. Always drawn from the OS entropy
/// source; this value gates authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    pub fn generate(length: usize) -> Result<Self, OtpCodeError> {
        let mut digits = String::with_capacity(length);
        while digits.len() < length {
            let mut buf = [0u8; 16];
            OsRng
                .try_fill_bytes(&mut buf)
                .map_err(|e| OtpCodeError::Rng(e.to_string()))?;
            for byte in buf {
                // Rejection sampling keeps the digit distribution uniform.
                if byte < 250 {
                    digits.push(char::from(b'0' + byte % 10));
                    if digits.len() == length {
                        break;
                    }
                }
            }
        }
        Ok(Self(digits))
    }

    pub fn parse(raw: &str, expected_length: usize) -> Result<Self, OtpCodeError> {
        let raw = raw.trim();
        if raw.len() != expected_length || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OtpCodeError::WrongShape {
                expected: expected_length,
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Comparison that does not short-circuit on the first differing digit.
    pub fn matches(&self, candidate: &str) -> bool {
        let own = self.0.as_bytes();
        let other = candidate.as_bytes();
        if own.len() != other.len() {
            return false;
        }
        own.iter().zip(other).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
    }
}

/// Identifier handed to the caller at `initiate` and echoed back at `verify`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeId(Uuid);

impl ChallengeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }
}

impl Default for ChallengeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One pending passcode. Lives from `initiate` until verification, expiry, or
/// attempt exhaustion; at most one record per issued id.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub id: ChallengeId,
    pub principal: PrincipalId,
    pub channel: ChannelKind,
    pub destination: Destination,
    pub code: OtpCode,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub attempts: u32,
}

impl OtpChallenge {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
