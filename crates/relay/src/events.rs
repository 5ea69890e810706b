//! Event classification and message formatting.
//!
//! Incoming payloads are classified by shape: a non-empty `AlarmName` key
//! marks a CloudWatch alarm state change, `source == "aws.trustedadvisor"`
//! marks a Trusted Advisor finding. Anything else degrades to a fixed
//! fallback string. Classification is total: malformed input is logged and
//! rendered as a fallback message, never an error to the caller.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::error;

/// Event source identifying Trusted Advisor findings.
const TRUSTED_ADVISOR_SOURCE: &str = "aws.trustedadvisor";

/// Fallback when an alarm payload is missing required fields.
const ALARM_FALLBACK: &str = "Unknown Cloudwatch alarm message format, check lambda execution logs";

/// Fallback when an advisory payload is missing required fields.
const ADVISORY_FALLBACK: &str =
    "Unknown Trusted adviser message format, check lambda execution logs";

/// Fallback when the payload matches no known shape.
const UNKNOWN_FALLBACK: &str = "Unknown message format, check lambda execution logs";

/// Display glyphs for alarm states. Unmapped states render as their raw name.
const STATE_ICONS: &[(&str, &str)] = &[
    ("OK", ":thumbsup:"),
    ("INSUFFICIENT_DATA", ":thinking_face:"),
    ("ALARM", ":fire:"),
];

fn state_icon(state: &str) -> &str {
    STATE_ICONS
        .iter()
        .find(|(name, _)| *name == state)
        .map_or(state, |&(_, icon)| icon)
}

/// Account id to human-readable name directory.
///
/// Ids absent from the directory render as-is.
#[derive(Debug, Clone, Default)]
pub struct AccountDirectory(HashMap<String, String>);

impl AccountDirectory {
    #[must_use]
    pub fn new(names: HashMap<String, String>) -> Self {
        Self(names)
    }

    /// Resolve an account id to its display name, falling back to the id.
    #[must_use]
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.0.get(id).map_or(id, String::as_str)
    }
}

/// A CloudWatch alarm state-change payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AlarmPayload {
    alarm_name: String,
    old_state_value: String,
    new_state_value: String,
    new_state_reason: String,
}

/// A Trusted Advisor finding payload.
#[derive(Debug, Deserialize)]
struct AdvisoryPayload {
    account: String,
    detail: AdvisoryDetail,
}

#[derive(Debug, Deserialize)]
struct AdvisoryDetail {
    #[serde(rename = "check-name")]
    check_name: String,
    #[serde(rename = "check-item-detail")]
    check_item_detail: Map<String, Value>,
}

/// Classify a payload and render the notification message.
///
/// Never fails: unrecognized or incomplete payloads yield a fixed fallback
/// string and an error-level diagnostic carrying the raw payload.
#[must_use]
pub fn classify_and_format(payload: &Value, accounts: &AccountDirectory) -> String {
    let has_alarm_name = payload
        .get("AlarmName")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.is_empty());

    if has_alarm_name {
        format_alarm(payload)
    } else if payload.get("source").and_then(Value::as_str) == Some(TRUSTED_ADVISOR_SOURCE) {
        format_advisory(payload, accounts)
    } else {
        error!(payload = %payload, "Unrecognized message shape");
        UNKNOWN_FALLBACK.to_string()
    }
}

fn format_alarm(payload: &Value) -> String {
    match AlarmPayload::deserialize(payload) {
        Ok(alarm) => format!(
            "*{} - {}*: {} ⟶  {}\n{}",
            alarm.alarm_name,
            alarm.new_state_value,
            state_icon(&alarm.old_state_value),
            state_icon(&alarm.new_state_value),
            alarm.new_state_reason,
        ),
        Err(e) => {
            error!(error = %e, payload = %payload, "Incomplete Cloudwatch alarm payload");
            ALARM_FALLBACK.to_string()
        }
    }
}

fn format_advisory(payload: &Value, accounts: &AccountDirectory) -> String {
    match AdvisoryPayload::deserialize(payload) {
        Ok(advisory) => format!(
            "*{} triggered in {}*\n{}",
            advisory.detail.check_name,
            accounts.display_name(&advisory.account),
            detail_block(&advisory.detail.check_item_detail),
        ),
        Err(e) => {
            error!(error = %e, payload = %payload, "Incomplete Trusted Advisor payload");
            ADVISORY_FALLBACK.to_string()
        }
    }
}

/// Render a check-item-detail mapping as one `key: _value_` line per entry,
/// in the mapping's iteration order.
fn detail_block(detail: &Map<String, Value>) -> String {
    let mut block = String::new();
    for (key, value) in detail {
        block.push_str(&format!("{key}: _{}_\n", scalar_text(value)));
    }
    block
}

/// String scalars render without quotes; everything else as JSON.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
