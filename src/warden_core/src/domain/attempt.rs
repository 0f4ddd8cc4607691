use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure accounting for one identifier (IP or account id). Created on the
/// first failure, cleared on success; an expired lock resets the count before
/// the next evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginAttemptRecord {
    pub identifier: String,
    pub failure_count: u32,
    pub last_attempt_at: DateTime<Utc>,
    pub locked_until: Option<DateTime<Utc>>,
    /// Completed lockout cycles since the last success; drives hard-block
    /// escalation and survives the reset-on-expiry.
    pub lockout_cycles: u32,
}

impl LoginAttemptRecord {
    pub fn new(identifier: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            identifier: identifier.into(),
            failure_count: 0,
            last_attempt_at: now,
            locked_until: None,
            lockout_cycles: 0,
        }
    }
}

/// Operator-reversible hard block. Unlike a lockout it never expires on its
/// own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpBlockEntry {
    pub ip: String,
    pub reason: String,
    pub blocked_at: DateTime<Utc>,
}
