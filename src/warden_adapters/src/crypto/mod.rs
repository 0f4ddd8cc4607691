pub mod field_encryption;

pub use field_encryption::{EncryptedPayload, FieldCryptoError, FieldEncryptionService};
