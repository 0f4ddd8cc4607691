use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use warden_core::{
    ChannelKind, DeliveryChannel, DeliveryError, DeliveryReceipt, DeliveryStatus, Destination,
    OtpMessage,
};

/// Client for an HTTP messaging provider that multiplexes every channel behind
/// one `/messages` endpoint. Non-"sent" acknowledgements and transport errors
/// both surface as [`DeliveryError`]; the gateway turns either into a generic
/// failure.
pub struct HttpProviderChannel {
    http_client: Client,
    base_url: String,
    api_token: Secret<String>,
}

impl HttpProviderChannel {
    pub fn new(base_url: String, api_token: Secret<String>, http_client: Client) -> Self {
        Self {
            http_client,
            base_url,
            api_token,
        }
    }
}

#[async_trait::async_trait]
impl DeliveryChannel for HttpProviderChannel {
    #[tracing::instrument(name = "Dispatching one-time code", skip_all, fields(channel = %channel))]
    async fn send(
        &self,
        channel: ChannelKind,
        destination: &Destination,
        payload: &OtpMessage,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let base = Url::parse(&self.base_url).map_err(|e| DeliveryError::Rejected(e.to_string()))?;
        let url = base
            .join("/messages")
            .map_err(|e| DeliveryError::Rejected(e.to_string()))?;

        let request_body = SendMessageRequest {
            channel: channel.as_str(),
            to: destination.raw(),
            code: payload.code.as_str(),
            body: &payload.message,
        };

        let response = self
            .http_client
            .post(url)
            .header(PROVIDER_AUTH_HEADER, self.api_token.expose_secret())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable(e.to_string()))?
            .error_for_status()
            .map_err(|e| DeliveryError::Rejected(e.to_string()))?;

        let ack: SendMessageResponse = response
            .json()
            .await
            .map_err(|e| DeliveryError::Rejected(e.to_string()))?;
        if ack.status != "sent" {
            return Err(DeliveryError::Rejected(format!(
                "provider status {}",
                ack.status
            )));
        }

        Ok(DeliveryReceipt {
            status: DeliveryStatus::Sent,
            provider_ref: ack.reference,
        })
    }
}

const PROVIDER_AUTH_HEADER: &str = "X-Provider-Token";

#[derive(serde::Serialize, Debug)]
struct SendMessageRequest<'a> {
    channel: &'a str,
    to: &'a str,
    code: &'a str,
    body: &'a str,
}

#[derive(serde::Deserialize, Debug)]
struct SendMessageResponse {
    status: String,
    #[serde(default)]
    reference: Option<String>,
}
