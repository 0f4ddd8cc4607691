//! # Warden - Authentication & Session Security Core
//!
//! This is a facade crate that re-exports the public APIs of the warden
//! components. Use this crate to get access to the whole security core in one
//! place.
//!
//! ## Structure
//!
//! - **Core domain types**: `PrincipalId`, `Password`, `Session`, `OtpCode`, etc.
//! - **Port traits**: `SessionStore`, `CredentialStore`, `DeliveryChannel`,
//!   `SecurityEventSink`, `SecondFactorVerifier`, `Clock`
//! - **Components**: `LockoutTracker`, `SessionManager`,
//!   `CredentialAuthenticator`, `OtpChannelGateway`, `SecurityPostureAssessor`
//! - **Adapters**: `InMemorySessionStore`, `RedisSessionStore`,
//!   `InMemoryCredentialStore`, `MockDeliveryChannel`, `HttpProviderChannel`,
//!   `FieldEncryptionService`, event sinks, configuration loading

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use warden_core::*;
}

// Re-export the most commonly used core types at the root level
pub use warden_core::{
    AuthOutcome, ChallengeId, ChannelKind, Destination, FailureReason, LockReason, MfaToken,
    OtpChallenge, OtpCode, Password, PasswordPolicy, PasswordPolicyEngine, PrincipalId,
    SecurityConfig, SecurityEvent, Session, SessionId, SessionValidation,
};

// ============================================================================
// Port Traits
// ============================================================================

/// Port trait definitions
pub mod ports {
    pub use warden_core::{
        Clock, CredentialError, CredentialRecord, CredentialStore, DeliveryChannel, DeliveryError,
        DeliveryReceipt, DeliveryStatus, ManualClock, NoopEventSink, OtpMessage,
        SecondFactorError, SecondFactorVerifier, SecurityEventSink, SessionStore,
        SessionStoreError, SystemClock,
    };
}

// Re-export port traits at root level
pub use warden_core::{
    Clock, CredentialStore, DeliveryChannel, ManualClock, SecondFactorVerifier, SecurityEventSink,
    SessionStore, SystemClock,
};

// ============================================================================
// Components (Application Layer)
// ============================================================================

/// Application components
pub mod components {
    pub use warden_application::*;
}

// Re-export components at root level
pub use warden_application::{
    CredentialAuthenticator, LockoutTracker, OtpChannelGateway, PostureInput,
    SecurityPostureAssessor, SessionManager,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use warden_adapters::persistence::*;
    }

    /// Delivery channel implementations
    pub mod delivery {
        pub use warden_adapters::delivery::*;
    }

    /// Field encryption
    pub mod crypto {
        pub use warden_adapters::crypto::*;
    }

    /// Security event sinks
    pub mod events {
        pub use warden_adapters::events::*;
    }

    /// Configuration loading
    pub mod config {
        pub use warden_adapters::config::*;
    }

    /// Tracing and error-report installation
    pub mod telemetry {
        pub use warden_adapters::telemetry::*;
    }
}

// Re-export commonly used adapters at root level
pub use warden_adapters::{
    ChannelEventSink, FieldEncryptionService, HttpProviderChannel, InMemoryCredentialStore,
    InMemorySessionStore, MockDeliveryChannel, RedisSessionStore, Settings, TracingEventSink,
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

/// Re-export the async runtime the components are built against
pub use tokio;
