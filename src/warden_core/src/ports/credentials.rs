use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{password::Password, principal::PrincipalId};

// CredentialStore port trait and errors
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Unknown principal")]
    UnknownPrincipal,
    #[error("Secret mismatch")]
    SecretMismatch,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for CredentialError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UnknownPrincipal, Self::UnknownPrincipal) => true,
            (Self::SecretMismatch, Self::SecretMismatch) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// What the authenticator needs back from the external credential
/// collaborator on a match.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialRecord {
    pub principal: PrincipalId,
    pub mfa_enabled: bool,
}

/// The stored-credential collaborator. `UnknownPrincipal` and `SecretMismatch`
/// must never diverge in anything user-visible; the authenticator collapses
/// them into one failure path.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn verify_credentials(
        &self,
        identifier: &PrincipalId,
        secret: &Password,
    ) -> Result<CredentialRecord, CredentialError>;
}
