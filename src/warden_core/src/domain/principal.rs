use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PrincipalError {
    #[error("Principal identifier cannot be empty")]
    Empty,
}

/// Identifier of the account being authenticated (account id, email, ...).
/// Opaque to this core; only the credential collaborator interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(String);

impl PrincipalId {
    pub fn new(id: impl Into<String>) -> Result<Self, PrincipalError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PrincipalError::Empty);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = PrincipalError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_identifiers() {
        assert_eq!(PrincipalId::new("  "), Err(PrincipalError::Empty));
        assert_eq!(PrincipalId::new(""), Err(PrincipalError::Empty));
    }

    #[test]
    fn keeps_the_raw_value() {
        let id = PrincipalId::new("user-42").unwrap();
        assert_eq!(id.as_str(), "user-42");
    }
}
