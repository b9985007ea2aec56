use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An alert object loaded from storage, paired with a temporary read link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRecord {
    /// Object key, e.g. `alerts/file_1.json`.
    pub key: String,
    /// Parsed JSON body, or `{"parse_error": "..."}` when unreadable.
    pub data: Value,
    pub presigned_url: String,
    /// Storage-reported last-modified time.
    pub ts: DateTime<Utc>,
}

impl AlertRecord {
    /// The `alert` text field, when present and a string.
    pub fn alert_text(&self) -> Option<&str> {
        self.data.get("alert").and_then(Value::as_str)
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.data.get("parse_error").and_then(Value::as_str)
    }

    pub fn pretty_data(&self) -> String {
        serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| self.data.to_string())
    }
}

/// A trigger written to storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerEvent {
    pub s3_key: String,
    pub content: String,
    pub timestamp: String,
    pub trigger_key: String,
}

impl TriggerEvent {
    /// Renders the text body of a trigger object.
    ///
    /// # Examples
    ///
    /// ```
    /// use caseiro_common::types::TriggerEvent;
    ///
    /// let body = TriggerEvent::render_content(
    ///     "sensor detected high ammonia",
    ///     "2025-09-20T20:21:35.414962Z",
    ///     "ammonia",
    ///     "Caseiro-UI",
    /// );
    /// assert_eq!(
    ///     body,
    ///     "sensor detected high ammonia\ngenerated_at=2025-09-20T20:21:35.414962Z\ntrigger_key=ammonia\nsource=Caseiro-UI\n"
    /// );
    /// ```
    pub fn render_content(base_message: &str, generated_at: &str, trigger_key: &str, source: &str) -> String {
        format!("{base_message}\ngenerated_at={generated_at}\ntrigger_key={trigger_key}\nsource={source}\n")
    }
}

/// The newest text object a downstream process wrote for a trigger key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelatedMessage {
    pub s3_key: String,
    pub content: String,
}

/// Hosted agent identity recorded in every alert document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentIdentity {
    #[serde(rename = "agentId")]
    pub agent_id: String,
    #[serde(rename = "agentAliasId")]
    pub agent_alias_id: String,
    pub region: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    pub bucket: String,
    pub key: String,
}

/// Alert JSON written by the ingestion reactor under the alerts prefix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertDocument {
    pub generated_at: String,
    pub agent: AgentIdentity,
    pub source: SourceRef,
    pub alert: String,
}
