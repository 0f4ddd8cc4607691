use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::channel::ChannelKind;
use crate::domain::policy::PasswordPolicy;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },
    #[error("otp_length must be between 4 and 10, got {0}")]
    OtpLength(usize),
    #[error("password min_length must be at least 4, got {0}")]
    PasswordMinLength(usize),
}

/// Per-channel `initiate` quotas inside one rolling window. Voice is the most
/// expensive channel and gets the tightest budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelQuotas {
    pub sms: u32,
    pub whatsapp: u32,
    pub telegram: u32,
    pub email: u32,
    pub voice: u32,
}

impl Default for ChannelQuotas {
    fn default() -> Self {
        Self {
            sms: 3,
            whatsapp: 3,
            telegram: 3,
            email: 5,
            voice: 2,
        }
    }
}

impl ChannelQuotas {
    pub fn for_channel(&self, channel: ChannelKind) -> u32 {
        match channel {
            ChannelKind::Sms => self.sms,
            ChannelKind::Whatsapp => self.whatsapp,
            ChannelKind::Telegram => self.telegram,
            ChannelKind::Email => self.email,
            ChannelKind::Voice => self.voice,
        }
    }
}

/// Process-wide security tuning, constructed and validated once at startup and
/// shared by reference with every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub max_login_attempts: u32,
    pub lockout_duration: Duration,
    pub hard_block_after_lockouts: u32,
    pub session_timeout: Duration,
    pub session_sweep_interval: Duration,
    pub otp_length: usize,
    pub otp_expiry: Duration,
    pub otp_max_attempts: u32,
    pub otp_cooldown: Duration,
    pub otp_requests_per_window: u32,
    pub otp_request_window: Duration,
    pub channel_quotas: ChannelQuotas,
    pub password_policy: PasswordPolicy,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_login_attempts: 5,
            lockout_duration: Duration::from_secs(15 * 60),
            hard_block_after_lockouts: 3,
            session_timeout: Duration::from_secs(60 * 60),
            session_sweep_interval: Duration::from_secs(5 * 60),
            otp_length: 6,
            otp_expiry: Duration::from_secs(5 * 60),
            otp_max_attempts: 3,
            otp_cooldown: Duration::from_secs(15 * 60),
            otp_requests_per_window: 3,
            otp_request_window: Duration::from_secs(15 * 60),
            channel_quotas: ChannelQuotas::default(),
            password_policy: PasswordPolicy::default(),
        }
    }
}

impl SecurityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nonzero: [(&'static str, u128); 8] = [
            ("max_login_attempts", self.max_login_attempts.into()),
            ("lockout_duration", self.lockout_duration.as_millis()),
            ("session_timeout", self.session_timeout.as_millis()),
            (
                "session_sweep_interval",
                self.session_sweep_interval.as_millis(),
            ),
            ("otp_expiry", self.otp_expiry.as_millis()),
            ("otp_max_attempts", self.otp_max_attempts.into()),
            (
                "otp_requests_per_window",
                self.otp_requests_per_window.into(),
            ),
            ("otp_request_window", self.otp_request_window.as_millis()),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(ConfigError::ZeroValue { field });
            }
        }
        if !(4..=10).contains(&self.otp_length) {
            return Err(ConfigError::OtpLength(self.otp_length));
        }
        if self.password_policy.min_length < 4 {
            return Err(ConfigError::PasswordMinLength(
                self.password_policy.min_length,
            ));
        }
        Ok(())
    }
}

/// Convert a config duration into a chrono span, saturating on overflow.
pub fn chrono_span(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX)
}
