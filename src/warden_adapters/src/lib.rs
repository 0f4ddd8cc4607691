pub mod config;
pub mod crypto;
pub mod delivery;
pub mod events;
pub mod persistence;
pub mod telemetry;

pub use config::settings::{Settings, SettingsError};
pub use crypto::field_encryption::{EncryptedPayload, FieldCryptoError, FieldEncryptionService};
pub use delivery::{HttpProviderChannel, MockDeliveryChannel, SentOtp};
pub use events::{ChannelEventSink, TracingEventSink};
pub use persistence::{InMemoryCredentialStore, InMemorySessionStore, RedisSessionStore};
