use async_trait::async_trait;
use thiserror::Error;

use crate::domain::principal::PrincipalId;

#[derive(Debug, Error)]
pub enum SecondFactorError {
    #[error("Second factor backend error: {0}")]
    Backend(String),
}

/// Verifies an out-of-band code for a principal during credential login.
/// The OTP gateway implements this against the caller's live challenge.
#[async_trait]
pub trait SecondFactorVerifier: Send + Sync {
    async fn verify_code(
        &self,
        principal: &PrincipalId,
        code: &str,
    ) -> Result<bool, SecondFactorError>;
}
