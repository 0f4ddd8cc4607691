use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{channel::ChannelKind, destination::Destination, otp::OtpCode};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Provider rejected the message: {0}")]
    Rejected(String),
    #[error("Provider unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Provider acknowledgement for one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    pub status: DeliveryStatus,
    pub provider_ref: Option<String>,
}

/// The message handed to a provider. `message` already embeds the code in a
/// human-readable sentence; voice providers read it out, text providers send
/// it as-is.
#[derive(Debug, Clone)]
pub struct OtpMessage {
    pub code: OtpCode,
    pub message: String,
}

/// Uniform capability over SMS/WhatsApp/Telegram/email/voice senders.
/// Channel-specific formatting lives behind this trait, never in the gateway.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(
        &self,
        channel: ChannelKind,
        destination: &Destination,
        payload: &OtpMessage,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}
