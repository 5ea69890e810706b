//! Notification relay for cloud-monitoring events.
//!
//! This crate receives CloudWatch alarm state changes and Trusted Advisor
//! findings wrapped in an SNS-style envelope, classifies them, formats a
//! human-readable message, and delivers it to a Slack channel via an
//! incoming webhook. The stored webhook URL may be a KMS-encrypted,
//! base64-encoded ciphertext; it is decrypted on every delivery.
//!
//! # Usage
//!
//! ```no_run
//! use relay::Relay;
//!
//! # async fn run(envelope: serde_json::Value) -> anyhow::Result<()> {
//! // Create the relay from environment variables
//! let relay = Relay::from_env().await?;
//!
//! // Process one trigger envelope
//! relay.handle(&envelope).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`events::classify_and_format`] turns a payload into a message string;
//!   it is total and degrades to fixed fallback strings on malformed input
//! - [`KmsDecryptor`] resolves the webhook destination, guarding every
//!   client call with a connection check and an error catch
//! - [`SlackChannel`] performs the single webhook POST
//! - [`Relay`] wires the three together per invocation
//!
//! Delivery failures are logged, never propagated; only a malformed trigger
//! envelope fails an invocation.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod secrets;

pub use channels::slack::SlackChannel;
pub use config::RelayConfig;
pub use error::{ChannelError, ConfigError, EnvelopeError};
pub use events::{classify_and_format, AccountDirectory};
pub use secrets::KmsDecryptor;

use serde_json::Value;
use tracing::{error, info};

/// Per-process relay context: configuration, secret resolver, and channel.
///
/// Construction is idempotent and side-effect-free, so a `Relay` may be
/// reused across invocations; nothing in it mutates after construction.
pub struct Relay {
    config: RelayConfig,
    secrets: KmsDecryptor,
    slack: SlackChannel,
}

impl Relay {
    /// Build the relay from environment variables and the ambient AWS
    /// environment.
    pub async fn from_env() -> Result<Self, ConfigError> {
        let config = RelayConfig::from_env()?;
        let secrets = KmsDecryptor::from_env().await;
        Ok(Self::new(config, secrets))
    }

    /// Build the relay from explicit parts.
    #[must_use]
    pub fn new(config: RelayConfig, secrets: KmsDecryptor) -> Self {
        let slack = SlackChannel::new(
            config.channel.clone(),
            config.hook_url.clone(),
            config.hook_url_encrypted,
        );
        Self {
            config,
            secrets,
            slack,
        }
    }

    /// Process one trigger envelope end to end.
    ///
    /// Extracts the embedded payload, formats the message, and delivers it.
    /// The delivery result is logged and not propagated; only envelope
    /// extraction errors surface to the caller.
    pub async fn handle(&self, envelope: &Value) -> Result<(), EnvelopeError> {
        info!(envelope = %envelope, "Received event");

        let payload = envelope::extract_payload(envelope)?;
        let message = classify_and_format(&payload, &self.config.accounts);

        match self.slack.deliver(&self.secrets, &message).await {
            Ok(()) => info!("Notification delivered"),
            Err(e) => error!(error = %e, "Notification delivery failed"),
        }

        Ok(())
    }
}
