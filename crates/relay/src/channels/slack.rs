//! Slack incoming-webhook delivery.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::secrets::KmsDecryptor;

/// Emoji attached to every relayed message.
const ICON_EMOJI: &str = ":fire_engine:";

/// Slack incoming-webhook channel.
///
/// Holds the target channel and the (possibly encrypted) webhook
/// destination. The destination is resolved to a plaintext URL on every
/// delivery, never cached.
pub struct SlackChannel {
    client: reqwest::Client,
    channel: String,
    destination: String,
    encrypted: bool,
}

impl SlackChannel {
    #[must_use]
    pub fn new(channel: String, destination: String, encrypted: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            channel,
            destination,
            encrypted,
        }
    }

    /// Deliver a formatted message with a single POST.
    ///
    /// `Ok(())` exactly when the webhook answers 2xx. A non-2xx status maps
    /// to [`ChannelError::Status`]; transport failures (connection, DNS,
    /// invalid URL, including the empty URL a failed secret resolution
    /// produces) surface as [`ChannelError::Http`]. No retry.
    pub async fn deliver(
        &self,
        secrets: &KmsDecryptor,
        message: &str,
    ) -> Result<(), ChannelError> {
        let url = secrets
            .resolve_plaintext(&self.destination, self.encrypted)
            .await;

        let body = SlackMessage {
            channel: &self.channel,
            text: message,
            icon_emoji: ICON_EMOJI,
        };

        debug!(channel = %self.channel, "Sending notification");

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!(channel = %self.channel, "Notification sent");
            Ok(())
        } else {
            warn!(channel = %self.channel, status = %status, "Webhook request failed");
            Err(ChannelError::Status {
                code: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            })
        }
    }
}

/// Incoming-webhook message body.
#[derive(Debug, Serialize)]
struct SlackMessage<'a> {
    channel: &'a str,
    text: &'a str,
    icon_emoji: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel_for(server: &MockServer) -> SlackChannel {
        SlackChannel::new("#ops".to_string(), server.uri(), false)
    }

    #[tokio::test]
    async fn delivers_message_body_on_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_json(json!({
                "channel": "#ops",
                "text": "hello",
                "icon_emoji": ":fire_engine:",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let result = channel_for(&server)
            .deliver(&KmsDecryptor::disconnected(), "hello")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_2xx_reports_code_and_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = channel_for(&server)
            .deliver(&KmsDecryptor::disconnected(), "hello")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Response Code 500: Internal Server Error");
    }

    #[tokio::test]
    async fn client_error_class_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = channel_for(&server)
            .deliver(&KmsDecryptor::disconnected(), "hello")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Response Code 404: Not Found");
    }

    #[tokio::test]
    async fn unresolved_destination_is_a_transport_error() {
        // Encrypted destination + no KMS client resolves to the empty URL.
        let channel = SlackChannel::new("#ops".to_string(), "AQICAHg=".to_string(), true);
        let err = channel
            .deliver(&KmsDecryptor::disconnected(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ChannelError::Http(_)));
        assert!(!err.to_string().is_empty());
    }
}
