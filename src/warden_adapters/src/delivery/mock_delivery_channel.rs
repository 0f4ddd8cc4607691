use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use warden_core::{
    ChannelKind, DeliveryChannel, DeliveryError, DeliveryReceipt, DeliveryStatus, Destination,
    OtpMessage,
};

/// One recorded dispatch.
#[derive(Debug, Clone)]
pub struct SentOtp {
    pub channel: ChannelKind,
    pub destination: Destination,
    pub code: String,
    pub message: String,
}

/// Records every dispatch instead of calling a provider. Tests read the issued
/// code back out of the log; `fail_next` simulates a provider outage.
#[derive(Clone, Default)]
pub struct MockDeliveryChannel {
    sent: Arc<RwLock<Vec<SentOtp>>>,
    fail_next: Arc<AtomicBool>,
}

impl MockDeliveryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentOtp> {
        self.sent.read().await.clone()
    }

    pub async fn last_code(&self) -> Option<String> {
        self.sent.read().await.last().map(|otp| otp.code.clone())
    }
}

#[async_trait::async_trait]
impl DeliveryChannel for MockDeliveryChannel {
    async fn send(
        &self,
        channel: ChannelKind,
        destination: &Destination,
        payload: &OtpMessage,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DeliveryError::Unreachable("mock outage".to_string()));
        }
        self.sent.write().await.push(SentOtp {
            channel,
            destination: destination.clone(),
            code: payload.code.as_str().to_string(),
            message: payload.message.clone(),
        });
        Ok(DeliveryReceipt {
            status: DeliveryStatus::Sent,
            provider_ref: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::OtpCode;

    #[tokio::test]
    async fn records_dispatches_in_order() {
        let channel = MockDeliveryChannel::new();
        let destination = Destination::parse(ChannelKind::Email, "user@example.com").unwrap();
        for raw in ["111111", "222222"] {
            let payload = OtpMessage {
                code: OtpCode::parse(raw, 6).unwrap(),
                message: format!("code {raw}"),
            };
            channel
                .send(ChannelKind::Email, &destination, &payload)
                .await
                .unwrap();
        }
        let sent = channel.sent().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(channel.last_code().await.as_deref(), Some("222222"));
    }

    #[tokio::test]
    async fn fail_next_affects_exactly_one_send() {
        let channel = MockDeliveryChannel::new();
        let destination = Destination::parse(ChannelKind::Sms, "+15551234567").unwrap();
        let payload = OtpMessage {
            code: OtpCode::parse("123456", 6).unwrap(),
            message: "code 123456".to_string(),
        };

        channel.fail_next();
        assert!(
            channel
                .send(ChannelKind::Sms, &destination, &payload)
                .await
                .is_err()
        );
        assert!(
            channel
                .send(ChannelKind::Sms, &destination, &payload)
                .await
                .is_ok()
        );
    }
}
