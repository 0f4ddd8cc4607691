use serde::{Deserialize, Serialize};

use crate::domain::password::Password;

/// Symbols counted as "special" by both validation and scoring.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{}|;:'\",.<>/?`~";

/// Composition rules applied by [`PasswordPolicyEngine::validate`]. Each rule
/// can be toggled independently; this is process-wide configuration, not
/// per-user state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_numbers: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            require_uppercase: true,
            require_numbers: true,
            require_special: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyViolation {
    TooShort,
    MissingUppercase,
    MissingNumber,
    MissingSpecial,
}

impl std::fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::TooShort => "too-short",
            Self::MissingUppercase => "missing-uppercase",
            Self::MissingNumber => "missing-number",
            Self::MissingSpecial => "missing-special",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyReport {
    pub violations: Vec<PolicyViolation>,
}

impl PolicyReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

/// Informational strength score; independent of whether the policy accepts
/// the password.
#[derive(Debug, Clone, PartialEq)]
pub struct StrengthScore {
    pub value: u8,
    pub label: StrengthLabel,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordPolicyEngine {
    policy: PasswordPolicy,
}

impl PasswordPolicyEngine {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PasswordPolicy {
        &self.policy
    }

    pub fn validate(&self, password: &Password) -> PolicyReport {
        let raw = password.expose();
        let mut violations = Vec::new();
        if raw.chars().count() < self.policy.min_length {
            violations.push(PolicyViolation::TooShort);
        }
        if self.policy.require_uppercase && !raw.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push(PolicyViolation::MissingUppercase);
        }
        if self.policy.require_numbers && !raw.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PolicyViolation::MissingNumber);
        }
        if self.policy.require_special && !raw.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            violations.push(PolicyViolation::MissingSpecial);
        }
        PolicyReport { violations }
    }

    /// Cheap shape gate used before the (possibly remote) credential check.
    pub fn meets_min_length(&self, password: &Password) -> bool {
        password.expose().chars().count() >= self.policy.min_length
    }

    pub fn score(&self, password: &Password) -> StrengthScore {
        let raw = password.expose();
        let length = raw.chars().count();
        let mut value: u8 = 0;
        if length >= 8 {
            value += 20;
        }
        if length >= 12 {
            value += 20;
        }
        if length >= 16 {
            value += 10;
        }
        if raw.chars().any(|c| c.is_ascii_lowercase()) {
            value += 10;
        }
        if raw.chars().any(|c| c.is_ascii_uppercase()) {
            value += 10;
        }
        if raw.chars().any(|c| c.is_ascii_digit()) {
            value += 10;
        }
        if raw.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            value += 20;
        }
        let value = value.min(100);
        let label = if value < 40 {
            StrengthLabel::Weak
        } else if value < 70 {
            StrengthLabel::Medium
        } else {
            StrengthLabel::Strong
        };
        StrengthScore { value, label }
    }
}
