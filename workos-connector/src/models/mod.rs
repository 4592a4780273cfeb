use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound WorkOS webhook body.
///
/// Only the envelope fields are typed; `data` is passed through untouched.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
}

/// Event handed to the workflow side once a delivery is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    pub event: Option<String>,
    pub id: Option<Value>,
    pub data: Option<Value>,
    pub created_at: Option<Value>,
    pub raw_payload: Value,
}

impl TriggerEvent {
    pub fn from_payload(raw_payload: Value) -> Result<Self, serde_json::Error> {
        let envelope: WebhookEvent = serde_json::from_value(raw_payload.clone())?;
        Ok(Self {
            event: envelope.event,
            id: envelope.id,
            data: envelope.data,
            created_at: envelope.created_at,
            raw_payload,
        })
    }
}

/// `list_metadata` object returned by WorkOS list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadata {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub after: Option<String>,
}

impl ListMetadata {
    /// Next-page cursor; empty strings count as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.after.as_deref().filter(|c| !c.is_empty())
    }

    pub fn previous_cursor(&self) -> Option<&str> {
        self.before.as_deref().filter(|c| !c.is_empty())
    }
}

/// One page of a WorkOS list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub list_metadata: ListMetadata,
}
