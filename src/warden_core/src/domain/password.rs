use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PasswordError {
    #[error("Password cannot be empty")]
    Empty,
}

/// A caller-supplied secret. Composition rules live in
/// [`crate::PasswordPolicyEngine`]; this type only guarantees the secret is
/// non-empty and never printed.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(secret: Secret<String>) -> Result<Self, Self::Error> {
        if secret.expose_secret().is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(secret))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
