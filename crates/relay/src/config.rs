//! Environment-sourced configuration.

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::events::AccountDirectory;

/// Target channel name.
const ENV_CHANNEL: &str = "RELAY_CHANNEL";

/// Webhook destination: a plaintext URL, or base64 KMS ciphertext when
/// `RELAY_HOOK_URL_ENCRYPTED` is set.
const ENV_HOOK_URL: &str = "RELAY_HOOK_URL";

/// Whether the destination is encrypted ("true"/"1", default true).
const ENV_HOOK_URL_ENCRYPTED: &str = "RELAY_HOOK_URL_ENCRYPTED";

/// Optional JSON object mapping account ids to display names.
const ENV_ACCOUNT_MAP: &str = "RELAY_ACCOUNT_MAP";

/// Relay configuration, read once at startup.
pub struct RelayConfig {
    pub channel: String,
    pub hook_url: String,
    pub hook_url_encrypted: bool,
    pub accounts: AccountDirectory,
}

impl RelayConfig {
    /// Read the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let channel =
            std::env::var(ENV_CHANNEL).map_err(|_| ConfigError::MissingVar(ENV_CHANNEL))?;
        let hook_url =
            std::env::var(ENV_HOOK_URL).map_err(|_| ConfigError::MissingVar(ENV_HOOK_URL))?;

        let hook_url_encrypted = std::env::var(ENV_HOOK_URL_ENCRYPTED)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(true);

        let accounts = match std::env::var(ENV_ACCOUNT_MAP) {
            Ok(raw) => {
                let names: HashMap<String, String> = serde_json::from_str(&raw)?;
                AccountDirectory::new(names)
            }
            Err(_) => AccountDirectory::default(),
        };

        Ok(Self {
            channel,
            hook_url,
            hook_url_encrypted,
            accounts,
        })
    }
}
