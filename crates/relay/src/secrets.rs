//! Secret resolution through the KMS decrypt service.
//!
//! The webhook destination is stored either as plaintext or as a
//! base64-encoded KMS ciphertext. Resolution happens once per delivery and
//! is never cached.
//!
//! Every call on the external client goes through two composable guards, in
//! order: a connection guard (skip the call when the client handle was never
//! constructed) and an error guard (any failure during the call is logged
//! and collapsed to an empty result). Resolution failures therefore never
//! propagate; delivery to the resulting empty destination fails downstream
//! as a transport error, visible in operator logs only.

use aws_sdk_kms::error::SdkError;
use aws_sdk_kms::operation::decrypt::DecryptError;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::Client;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::future::Future;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
enum DecryptCallError {
    #[error("invalid base64 ciphertext: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Kms(#[from] SdkError<DecryptError>),

    #[error("decrypt response contained no plaintext")]
    MissingPlaintext,

    #[error("plaintext is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// KMS-backed secret resolver.
///
/// Holds a lazily-constructed client handle; a handle that was never built
/// (see [`KmsDecryptor::disconnected`]) trips the connection guard instead
/// of failing the caller.
pub struct KmsDecryptor {
    client: Option<Client>,
}

impl KmsDecryptor {
    /// Build a resolver from the ambient AWS environment.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Some(Client::new(&config)),
        }
    }

    /// A resolver whose client handle was never constructed.
    ///
    /// Every decrypt attempt trips the connection guard and resolves empty.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self { client: None }
    }

    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client: Some(client) }
    }

    /// Resolve a destination secret to plaintext.
    ///
    /// When `encoded` is false the secret is assumed to already be plaintext
    /// and is returned unchanged. When true, it is base64-decoded and
    /// decrypted; any failure resolves to an empty string after logging.
    pub async fn resolve_plaintext(&self, secret: &str, encoded: bool) -> String {
        if !encoded {
            return secret.to_string();
        }

        let Some(client) = self.connected("decrypt") else {
            return String::new();
        };

        guard_errors("decrypt", decrypt_once(client, secret))
            .await
            .unwrap_or_default()
    }

    /// Connection guard: yields the client handle, or logs and yields
    /// nothing when the handle was never constructed.
    fn connected(&self, op: &'static str) -> Option<&Client> {
        if self.client.is_none() {
            warn!(op, "KMS client not initialized, skipping call");
        }
        self.client.as_ref()
    }
}

/// Error guard: awaits a client call, converting any failure into a logged
/// diagnostic and an empty result.
async fn guard_errors<T, E, Fut>(op: &'static str, call: Fut) -> Option<T>
where
    E: std::fmt::Display,
    Fut: Future<Output = Result<T, E>>,
{
    match call.await {
        Ok(value) => Some(value),
        Err(e) => {
            error!(op, error = %e, "KMS client call failed");
            None
        }
    }
}

async fn decrypt_once(client: &Client, encoded: &str) -> Result<String, DecryptCallError> {
    let ciphertext = BASE64.decode(encoded)?;
    let output = client
        .decrypt()
        .ciphertext_blob(Blob::new(ciphertext))
        .send()
        .await?;
    let plaintext = output.plaintext.ok_or(DecryptCallError::MissingPlaintext)?;
    Ok(String::from_utf8(plaintext.into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn plaintext_secret_passes_through() {
        let resolver = KmsDecryptor::disconnected();
        let resolved = resolver
            .resolve_plaintext("https://hooks.slack.com/services/abc123", false)
            .await;
        assert_eq!(resolved, "https://hooks.slack.com/services/abc123");
    }

    #[tokio::test]
    async fn connection_guard_resolves_empty() {
        let resolver = KmsDecryptor::disconnected();
        let resolved = resolver.resolve_plaintext("AQICAHg=", true).await;
        assert_eq!(resolved, "");
    }

    #[tokio::test]
    async fn error_guard_logs_and_yields_none() {
        let result: Option<()> =
            guard_errors("decrypt", async { Err::<(), _>("client error") }).await;
        assert!(result.is_none());
    }
}
