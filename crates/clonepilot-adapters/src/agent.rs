//! HTTP client for the external sequence-lookup agent
//!
//! The agent is a research assistant, not an API: its reply is free text
//! with the actual result embedded as a JSON object between fixed sentinel
//! markers. Only the delimited region is parsed; the surrounding prose is
//! ignored. A structured deployment may also answer with a bare JSON object
//! and no prose, which is accepted as-is.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use clonepilot_assembly::{sanitize_sequence, SequenceRecord};
use clonepilot_core::{CollaboratorError, LookupQuery, Payload, SequenceLookup};

/// Marker opening the JSON region of an agent reply
pub const JSON_BEGIN: &str = "<<<JSON>>>";

/// Marker closing the JSON region of an agent reply
pub const JSON_END: &str = "<<<END_JSON>>>";

/// Reply fields the agent is expected to fill
mod reply {
    pub const NAME: &str = "Name";
    pub const SEQUENCE: &str = "Sequence";
    pub const PROMOTER: &str = "Promoter";
    pub const SELECTION_MARKER: &str = "SelectionMarker";
    pub const ORIGIN: &str = "Origin";
}

/// Client for the sequence-lookup agent endpoint
pub struct AgentLookupClient {
    client: Client,
    endpoint: String,
}

impl AgentLookupClient {
    /// Create a client for the given agent endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Turn a parsed agent reply into a sequence record
    ///
    /// An absent or empty `Sequence` field is a definitive miss. The
    /// record's name falls back to the query when the agent does not echo
    /// one; the sequence itself is never invented.
    fn decode_record(
        query: &LookupQuery,
        value: Value,
    ) -> Result<Option<SequenceRecord>, CollaboratorError> {
        let payload = Payload::from_value(value)
            .map_err(|e| CollaboratorError::MalformedReply(e.to_string()))?;

        let sequence = sanitize_sequence(&payload.text_or_empty(reply::SEQUENCE));
        if sequence.is_empty() {
            debug!(name = %query.name, kind = query.kind.as_str(), "Agent found nothing");
            return Ok(None);
        }

        let name = payload.text_or_empty(reply::NAME);
        let name = if name.is_empty() {
            query.name.clone()
        } else {
            name
        };

        let mut record = SequenceRecord::new(name, sequence);
        record.promoter = optional(&payload, reply::PROMOTER);
        record.selection_marker = optional(&payload, reply::SELECTION_MARKER);
        record.origin = optional(&payload, reply::ORIGIN);
        Ok(Some(record))
    }
}

fn optional(payload: &Payload, field: &str) -> Option<String> {
    let value = payload.text_or_empty(field);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Pull the JSON object out of an agent reply
///
/// Prefers the sentinel-delimited region; falls back to treating the whole
/// trimmed reply as JSON when no opening marker is present. Anything else
/// is a malformed reply, never a panic.
pub fn extract_delimited_json(text: &str) -> Result<Value, CollaboratorError> {
    if let Some(begin) = text.find(JSON_BEGIN) {
        let after = &text[begin + JSON_BEGIN.len()..];
        let end = after.find(JSON_END).ok_or_else(|| {
            CollaboratorError::MalformedReply(format!(
                "agent reply opened {} without closing {}",
                JSON_BEGIN, JSON_END
            ))
        })?;
        let region = after[..end].trim();
        return serde_json::from_str(region)
            .map_err(|e| CollaboratorError::MalformedReply(format!("bad JSON region: {}", e)));
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return serde_json::from_str(trimmed)
            .map_err(|e| CollaboratorError::MalformedReply(format!("bad JSON reply: {}", e)));
    }

    Err(CollaboratorError::MalformedReply(
        "agent reply carries no JSON object".to_string(),
    ))
}

#[async_trait]
impl SequenceLookup for AgentLookupClient {
    async fn lookup(
        &self,
        query: &LookupQuery,
    ) -> Result<Option<SequenceRecord>, CollaboratorError> {
        debug!(name = %query.name, kind = query.kind.as_str(), "Querying lookup agent");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({
                "name": query.name,
                "kind": query.kind.as_str(),
            }))
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            warn!(%status, "Lookup agent returned an error");
            return Err(CollaboratorError::Transport(format!(
                "lookup agent returned {}: {}",
                status, error_body
            )));
        }

        let reply = response
            .text()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

        let value = extract_delimited_json(&reply)?;
        Self::decode_record(query, value)
    }
}
