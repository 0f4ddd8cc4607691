pub mod config;
pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    attempt::{IpBlockEntry, LoginAttemptRecord},
    channel::ChannelKind,
    destination::{Destination, DestinationError},
    event::SecurityEvent,
    otp::{ChallengeId, OtpChallenge, OtpCode, OtpCodeError},
    outcome::{AuthOutcome, FailureReason, LockReason, MfaToken},
    password::{Password, PasswordError},
    policy::{
        PasswordPolicy, PasswordPolicyEngine, PolicyReport, PolicyViolation, StrengthLabel,
        StrengthScore,
    },
    principal::{PrincipalError, PrincipalId},
    session::{Session, SessionId, SessionIdError, SessionValidation},
};

pub use config::{ChannelQuotas, ConfigError, SecurityConfig, chrono_span};

pub use ports::{
    clock::{Clock, ManualClock, SystemClock},
    credentials::{CredentialError, CredentialRecord, CredentialStore},
    delivery::{DeliveryChannel, DeliveryError, DeliveryReceipt, DeliveryStatus, OtpMessage},
    events::{NoopEventSink, SecurityEventSink},
    second_factor::{SecondFactorError, SecondFactorVerifier},
    stores::{SessionStore, SessionStoreError},
};
