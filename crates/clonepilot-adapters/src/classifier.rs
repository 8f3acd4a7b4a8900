//! HTTP classifier over an OpenAI-style chat-completions endpoint
//!
//! Each filled prompt becomes one chat request. The endpoint is asked for a
//! JSON object (`response_format`, temperature zero) and the message content
//! is decoded straight into a [`Payload`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use clonepilot_core::{Classifier, CollaboratorError, Payload};

/// Classifier backed by a chat-completions HTTP endpoint
pub struct HttpClassifier {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    /// Create a classifier for the given endpoint and model
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        }
    }

    /// Format the chat-completions URL
    fn chat_completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, prompt: &str) -> Result<Payload, CollaboratorError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Classifying");

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.0,
            "response_format": { "type": "json_object" },
        });

        let mut request = self.client.post(self.chat_completions_url()).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| CollaboratorError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            warn!(%status, "Classifier returned an error");
            return Err(CollaboratorError::Transport(format!(
                "classifier returned {}: {}",
                status, error_body
            )));
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| CollaboratorError::MalformedReply(e.to_string()))?;

        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                CollaboratorError::MalformedReply(
                    "classifier reply has no message content".to_string(),
                )
            })?;

        let fields: Value = serde_json::from_str(content)?;
        Payload::from_value(fields).map_err(|e| CollaboratorError::MalformedReply(e.to_string()))
    }
}
