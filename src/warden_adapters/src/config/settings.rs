use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use warden_core::{ChannelQuotas, ConfigError, PasswordPolicy, SecurityConfig};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Millisecond-denominated knobs as they appear in files and environment
/// variables. Converted into the validated [`SecurityConfig`] once at
/// startup; nothing reads raw settings after that.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_login_attempts: u32,
    pub lockout_duration_ms: u64,
    pub hard_block_after_lockouts: u32,
    pub session_timeout_ms: u64,
    pub session_sweep_interval_ms: u64,
    pub otp_length: usize,
    pub otp_expiry_ms: u64,
    pub otp_max_attempts: u32,
    pub otp_cooldown_ms: u64,
    pub otp_requests_per_window: u32,
    pub otp_request_window_ms: u64,
    pub password_min_length: usize,
    pub password_require_uppercase: bool,
    pub password_require_numbers: bool,
    pub password_require_special: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_login_attempts: 5,
            lockout_duration_ms: 900_000,
            hard_block_after_lockouts: 3,
            session_timeout_ms: 3_600_000,
            session_sweep_interval_ms: 300_000,
            otp_length: 6,
            otp_expiry_ms: 300_000,
            otp_max_attempts: 3,
            otp_cooldown_ms: 900_000,
            otp_requests_per_window: 3,
            otp_request_window_ms: 900_000,
            password_min_length: 12,
            password_require_uppercase: true,
            password_require_numbers: true,
            password_require_special: true,
        }
    }
}

impl Settings {
    /// Layered load: built-in defaults, then an optional `warden.json` next to
    /// the process, then `WARDEN_*` environment variables.
    pub fn load() -> Result<SecurityConfig, SettingsError> {
        dotenvy::dotenv().ok();
        let raw = Config::builder()
            .add_source(File::with_name("warden").required(false))
            .add_source(Environment::with_prefix("WARDEN"))
            .build()?;
        let settings: Settings = raw.try_deserialize()?;
        settings.into_security_config()
    }

    pub fn into_security_config(self) -> Result<SecurityConfig, SettingsError> {
        let config = SecurityConfig {
            max_login_attempts: self.max_login_attempts,
            lockout_duration: Duration::from_millis(self.lockout_duration_ms),
            hard_block_after_lockouts: self.hard_block_after_lockouts,
            session_timeout: Duration::from_millis(self.session_timeout_ms),
            session_sweep_interval: Duration::from_millis(self.session_sweep_interval_ms),
            otp_length: self.otp_length,
            otp_expiry: Duration::from_millis(self.otp_expiry_ms),
            otp_max_attempts: self.otp_max_attempts,
            otp_cooldown: Duration::from_millis(self.otp_cooldown_ms),
            otp_requests_per_window: self.otp_requests_per_window,
            otp_request_window: Duration::from_millis(self.otp_request_window_ms),
            channel_quotas: ChannelQuotas::default(),
            password_policy: PasswordPolicy {
                min_length: self.password_min_length,
                require_uppercase: self.password_require_uppercase,
                require_numbers: self.password_require_numbers,
                require_special: self.password_require_special,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
