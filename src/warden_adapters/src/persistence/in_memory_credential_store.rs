use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use dashmap::DashMap;
use secrecy::{ExposeSecret, Secret};
use warden_core::{CredentialError, CredentialRecord, CredentialStore, Password, PrincipalId};

struct StoredCredential {
    secret_hash: Secret<String>,
    mfa_enabled: bool,
}

/// Reference credential collaborator: argon2id-hashed secrets and a
/// per-principal MFA flag, held in process. Production deployments put their
/// own directory behind the same port.
#[derive(Default, Clone)]
pub struct InMemoryCredentialStore {
    records: Arc<DashMap<PrincipalId, StoredCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces a principal's credential.
    #[tracing::instrument(name = "Registering credential", skip_all)]
    pub async fn upsert(
        &self,
        principal: PrincipalId,
        secret: Password,
        mfa_enabled: bool,
    ) -> Result<(), CredentialError> {
        let secret_hash = compute_secret_hash(secret)
            .await
            .map_err(CredentialError::UnexpectedError)?;
        self.records.insert(
            principal,
            StoredCredential {
                secret_hash,
                mfa_enabled,
            },
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    #[tracing::instrument(name = "Validating credentials in memory", skip_all)]
    async fn verify_credentials(
        &self,
        identifier: &PrincipalId,
        secret: &Password,
    ) -> Result<CredentialRecord, CredentialError> {
        let (expected_hash, mfa_enabled) = {
            let Some(record) = self.records.get(identifier) else {
                return Err(CredentialError::UnknownPrincipal);
            };
            (record.secret_hash.clone(), record.mfa_enabled)
        };

        verify_secret_hash(expected_hash, secret.clone())
            .await
            .map_err(|_| CredentialError::SecretMismatch)?;

        Ok(CredentialRecord {
            principal: identifier.clone(),
            mfa_enabled,
        })
    }
}

#[tracing::instrument(name = "Verify secret hash", skip_all)]
async fn verify_secret_hash(
    expected_secret_hash: Secret<String>,
    secret_candidate: Password,
) -> Result<(), String> {
    let current_span: tracing::Span = tracing::Span::current();
    let result = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let expected_secret_hash: PasswordHash<'_> =
                PasswordHash::new(expected_secret_hash.expose_secret())
                    .map_err(|e| e.to_string())?;

            Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
            )
            .verify_password(
                secret_candidate.as_ref().expose_secret().as_bytes(),
                &expected_secret_hash,
            )
            .map_err(|e| e.to_string())
        })
    })
    .await
    .map_err(|e| e.to_string())?;

    result
}

#[tracing::instrument(name = "Computing secret hash", skip_all)]
async fn compute_secret_hash(secret: Password) -> Result<Secret<String>, String> {
    let current_span: tracing::Span = tracing::Span::current();
    let result = tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let salt = SaltString::generate(&mut rand_core::OsRng);
            let secret_hash = Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(15000, 2, 1, None).map_err(|e| e.to_string())?,
            )
            .hash_password(secret.as_ref().expose_secret().as_bytes(), &salt)
            .map_err(|e| e.to_string())?
            .to_string();

            Ok(Secret::from(secret_hash))
        })
    })
    .await
    .map_err(|e| e.to_string())?;

    result
}
