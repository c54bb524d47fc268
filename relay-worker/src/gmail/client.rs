//! Gmail REST API client.
//!
//! `search` issues the fixed query, then fetches each listed message with
//! `format=full`. A single message failing to fetch is logged and skipped so
//! one bad message never sinks the batch.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use super::types::{ListResponse, RawMessage};

/// Gmail API base URL for the authenticated user.
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Thin Gmail REST client with bearer-token authentication.
pub struct GmailClient {
    http: Client,
    access_token: String,
    base_url: String,
}

impl GmailClient {
    /// Create a new client with the given access token.
    pub fn new(access_token: String) -> Result<Self> {
        Self::with_base_url(access_token, GMAIL_API_BASE)
    }

    /// Create a client against a custom base URL (for testing).
    pub fn with_base_url(access_token: String, base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            access_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Search for messages matching `query` and fetch each in full format.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<RawMessage>> {
        let url = format!("{}/messages", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("q", query), ("maxResults", &max_results.to_string())])
            .send()
            .await
            .context("Gmail list request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gmail list_messages failed ({status}): {body}");
        }

        let list: ListResponse = resp
            .json()
            .await
            .context("Failed to decode Gmail list response")?;
        let refs = list.messages.unwrap_or_default();

        info!(query = query, message_count = refs.len(), "gmail_list_complete");

        let mut messages = Vec::with_capacity(refs.len());
        for msg_ref in &refs {
            match self.get_message(&msg_ref.id).await {
                Ok(message) => messages.push(message),
                Err(e) => {
                    warn!(message_id = %msg_ref.id, error = %e, "gmail_fetch_failed");
                }
            }
        }

        Ok(messages)
    }

    /// Fetch a single message by id in full format.
    pub async fn get_message(&self, message_id: &str) -> Result<RawMessage> {
        let url = format!("{}/messages/{}", self.base_url, message_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("format", "full")])
            .send()
            .await
            .context("Gmail get request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gmail get_message failed ({status}): {body}");
        }

        resp.json()
            .await
            .context("Failed to decode Gmail message response")
    }
}
