//! Gmail REST API message types.
//!
//! Mirrors the `users.messages.get?format=full` response shape: a message
//! carries a payload which is itself a MIME part, with headers, an optional
//! base64url-encoded body, and arbitrarily nested sub-parts.

use serde::Deserialize;

/// A raw Gmail message as returned by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    /// Gmail message identifier, unique per email
    pub id: String,
    /// Short plain-text preview of the message
    #[serde(default)]
    pub snippet: String,
    /// Root of the MIME part tree
    pub payload: Option<MessagePart>,
}

/// One node of the MIME part tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// A single email header.
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Body data of a part, base64url-encoded when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

impl RawMessage {
    /// Look up a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.payload.as_ref().and_then(|payload| {
            payload
                .headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.as_str())
        })
    }
}

/// Response of the message list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse {
    pub messages: Option<Vec<MessageRef>>,
}

/// Minimal message reference from the list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageRef {
    pub id: String,
}
