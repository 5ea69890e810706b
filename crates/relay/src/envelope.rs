//! SNS-style trigger envelope.
//!
//! The event bus wraps the actual payload in an envelope whose first record
//! carries the event as an embedded JSON string. Malformed JSON here is
//! fatal by design: it means upstream delivery is broken.

use serde::Deserialize;
use serde_json::Value;

use crate::error::EnvelopeError;

#[derive(Debug, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Records")]
    records: Vec<SnsRecord>,
}

#[derive(Debug, Deserialize)]
struct SnsRecord {
    #[serde(rename = "Sns")]
    sns: SnsEntry,
}

#[derive(Debug, Deserialize)]
struct SnsEntry {
    #[serde(rename = "Message")]
    message: String,
}

/// Extract and decode the embedded event payload from the first record.
pub fn extract_payload(envelope: &Value) -> Result<Value, EnvelopeError> {
    let envelope = SnsEnvelope::deserialize(envelope)?;
    let record = envelope.records.first().ok_or(EnvelopeError::NoRecords)?;
    Ok(serde_json::from_str(&record.sns.message)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_embedded_payload() {
        let envelope = json!({
            "Records": [
                { "Sns": { "Message": r#"{"AlarmName":"HighCPU"}"# } }
            ]
        });

        let payload = extract_payload(&envelope).unwrap();
        assert_eq!(payload["AlarmName"], "HighCPU");
    }

    #[test]
    fn missing_records_is_fatal() {
        let envelope = json!({ "Records": [] });
        assert!(matches!(
            extract_payload(&envelope),
            Err(EnvelopeError::NoRecords)
        ));
    }

    #[test]
    fn malformed_embedded_json_is_fatal() {
        let envelope = json!({
            "Records": [ { "Sns": { "Message": "not json" } } ]
        });
        assert!(matches!(
            extract_payload(&envelope),
            Err(EnvelopeError::Json(_))
        ));
    }

    #[test]
    fn missing_sns_path_is_fatal() {
        let envelope = json!({ "Records": [ { "EventSource": "aws:sqs" } ] });
        assert!(matches!(
            extract_payload(&envelope),
            Err(EnvelopeError::Json(_))
        ));
    }
}
