use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::channel::ChannelKind;

/// Structured security events for the SIEM tier. Destinations are masked
/// before an event is constructed; no variant carries a raw destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum SecurityEvent {
    #[serde(rename = "auth.success")]
    AuthSuccess {
        principal: String,
        origin_ip: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "auth.failure")]
    AuthFailure {
        identifier: String,
        origin_ip: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "auth.locked")]
    AuthLocked {
        identifier: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "otp.sent")]
    OtpSent {
        masked_destination: String,
        channel: ChannelKind,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "otp.verified")]
    OtpVerified {
        principal: String,
        channel: ChannelKind,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "otp.failed")]
    OtpFailed {
        masked_destination: String,
        channel: ChannelKind,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl SecurityEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthSuccess { .. } => "auth.success",
            Self::AuthFailure { .. } => "auth.failure",
            Self::AuthLocked { .. } => "auth.locked",
            Self::OtpSent { .. } => "otp.sent",
            Self::OtpVerified { .. } => "otp.verified",
            Self::OtpFailed { .. } => "otp.failed",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::AuthSuccess { timestamp, .. }
            | Self::AuthFailure { timestamp, .. }
            | Self::AuthLocked { timestamp, .. }
            | Self::OtpSent { timestamp, .. }
            | Self::OtpVerified { timestamp, .. }
            | Self::OtpFailed { timestamp, .. } => *timestamp,
        }
    }
}
