//! Error types for the relay.

use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP transport failed (connection refused, DNS, invalid URL, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The webhook answered with a non-2xx status
    #[error("Response Code {code}: {reason}")]
    Status { code: u16, reason: String },
}

/// Errors extracting the event payload from the trigger envelope.
///
/// These are fatal for the invocation: a malformed envelope means the
/// upstream delivery is broken and must surface visibly.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope or its embedded message is not valid JSON
    #[error("malformed trigger payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope carries no records
    #[error("envelope contains no records")]
    NoRecords,
}

/// Errors building the relay configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// The account map is not a valid JSON object of strings
    #[error("invalid account map: {0}")]
    AccountMap(#[from] serde_json::Error),
}
