pub mod authenticator;
pub mod lockout;
pub mod otp_gateway;
pub mod posture;
pub mod session_manager;

#[cfg(test)]
mod test_support;

pub use authenticator::{AuthenticatorError, CredentialAuthenticator};
pub use lockout::{FailureDecision, LockoutTracker};
pub use otp_gateway::{OtpChannelGateway, OtpInitiateError, OtpIssue, OtpVerifyError};
pub use posture::{PostureGrade, PostureInput, PostureReport, SecurityPostureAssessor};
pub use session_manager::{SessionError, SessionManager};
