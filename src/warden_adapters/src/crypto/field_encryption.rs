use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use rand::TryRngCore;
use rand::rngs::OsRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldCryptoError {
    #[error("Key material must be exactly 32 bytes")]
    BadKeyLength,
    #[error("Could not draw nonce entropy: {0}")]
    Rng(String),
    #[error("Payload could not be serialized: {0}")]
    Serialize(String),
    #[error("Encryption failure")]
    EncryptionFailed,
    #[error("Ciphertext or authentication tag did not verify")]
    DecryptionFailed,
    #[error("Decrypted payload has an unexpected shape")]
    Malformed,
}

/// AEAD output. Opaque to every other component; holders store or transmit it
/// as-is and hand it back for decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; 12],
    pub auth_tag: [u8; 16],
}

/// AES-256-GCM over a canonical JSON encoding of the value, with a fresh
/// 96-bit nonce per call. The key is injected, pre-validated 256-bit
/// material; rotation happens outside this service.
pub struct FieldEncryptionService {
    cipher: Aes256Gcm,
}

impl FieldEncryptionService {
    pub fn new(key: &[u8]) -> Result<Self, FieldCryptoError> {
        if key.len() != 32 {
            return Err(FieldCryptoError::BadKeyLength);
        }
        Ok(Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        })
    }

    pub fn encrypt<T: Serialize>(&self, value: &T) -> Result<EncryptedPayload, FieldCryptoError> {
        let plaintext =
            serde_json::to_vec(value).map_err(|e| FieldCryptoError::Serialize(e.to_string()))?;

        let mut nonce = [0u8; 12];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| FieldCryptoError::Rng(e.to_string()))?;

        let mut sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|_| FieldCryptoError::EncryptionFailed)?;

        // The cipher appends the 16-byte tag; keep it as a separate field.
        if sealed.len() < 16 {
            return Err(FieldCryptoError::EncryptionFailed);
        }
        let tag_bytes = sealed.split_off(sealed.len() - 16);
        let mut auth_tag = [0u8; 16];
        auth_tag.copy_from_slice(&tag_bytes);

        Ok(EncryptedPayload {
            ciphertext: sealed,
            nonce,
            auth_tag,
        })
    }

    /// Fails closed: any tampering with ciphertext, nonce, or tag yields
    /// [`FieldCryptoError::DecryptionFailed`], never corrupted plaintext.
    pub fn decrypt<T: DeserializeOwned>(
        &self,
        payload: &EncryptedPayload,
    ) -> Result<T, FieldCryptoError> {
        let mut sealed = Vec::with_capacity(payload.ciphertext.len() + payload.auth_tag.len());
        sealed.extend_from_slice(&payload.ciphertext);
        sealed.extend_from_slice(&payload.auth_tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&payload.nonce), sealed.as_slice())
            .map_err(|_| FieldCryptoError::DecryptionFailed)?;

        serde_json::from_slice(&plaintext).map_err(|_| FieldCryptoError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        email: String,
        phone: String,
        recovery_codes: Vec<String>,
    }

    fn profile() -> Profile {
        Profile {
            email: "user@example.com".to_string(),
            phone: "+15551234567".to_string(),
            recovery_codes: vec!["aaaa-bbbb".to_string(), "cccc-dddd".to_string()],
        }
    }

    fn service() -> FieldEncryptionService {
        FieldEncryptionService::new(&[7u8; 32]).unwrap()
    }

    #[test]
    fn round_trip_restores_the_value() {
        let service = service();
        let sealed = service.encrypt(&profile()).unwrap();
        let restored: Profile = service.decrypt(&sealed).unwrap();
        assert_eq!(restored, profile());
    }

    #[test]
    fn nonces_are_fresh_per_call() {
        let service = service();
        let a = service.encrypt(&profile()).unwrap();
        let b = service.encrypt(&profile()).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn tampered_ciphertext_fails_closed() {
        let service = service();
        let mut sealed = service.encrypt(&profile()).unwrap();
        sealed.ciphertext[0] ^= 0xFF;
        let result: Result<Profile, _> = service.decrypt(&sealed);
        assert!(matches!(result, Err(FieldCryptoError::DecryptionFailed)));
    }

    #[test]
    fn tampered_tag_fails_closed() {
        let service = service();
        let mut sealed = service.encrypt(&profile()).unwrap();
        sealed.auth_tag[15] ^= 0x01;
        let result: Result<Profile, _> = service.decrypt(&sealed);
        assert!(matches!(result, Err(FieldCryptoError::DecryptionFailed)));
    }

    #[test]
    fn wrong_key_cannot_decrypt() {
        let sealed = service().encrypt(&profile()).unwrap();
        let other = FieldEncryptionService::new(&[8u8; 32]).unwrap();
        let result: Result<Profile, _> = other.decrypt(&sealed);
        assert!(matches!(result, Err(FieldCryptoError::DecryptionFailed)));
    }

    #[test]
    fn short_keys_are_refused() {
        assert!(matches!(
            FieldEncryptionService::new(&[0u8; 16]),
            Err(FieldCryptoError::BadKeyLength)
        ));
    }
}
