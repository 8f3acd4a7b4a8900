//! Runtime configuration for the collaborator adapters
//!
//! Everything is read from `CLONEPILOT_*` environment variables. The two
//! service URLs are required; the rest fall back to sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::AdapterError;

/// Adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Path to the curated plasmid library CSV
    #[serde(default = "default_library_path")]
    pub library_path: String,

    /// Base URL of the classification service
    pub classifier_url: String,

    /// Model name sent with every classification request
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Bearer token for the classification service
    #[serde(default)]
    pub classifier_api_key: Option<String>,

    /// URL of the external sequence-lookup agent
    pub lookup_url: String,

    /// How many times a state may try the lookup agent before degrading
    #[serde(default = "default_lookup_attempts")]
    pub lookup_attempts: u32,

    /// Delay between lookup attempts, in milliseconds
    #[serde(default = "default_lookup_retry_delay_ms")]
    pub lookup_retry_delay_ms: u64,
}

fn default_library_path() -> String {
    "resources/plasmid_library.csv".to_string()
}

fn default_classifier_model() -> String {
    "gpt-4o".to_string()
}

fn default_lookup_attempts() -> u32 {
    3
}

fn default_lookup_retry_delay_ms() -> u64 {
    500
}

impl AdapterConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, AdapterError> {
        // Start with defaults
        let mut config = Self::default();

        // Override from environment variables
        if let Ok(library_path) = env::var("CLONEPILOT_LIBRARY_PATH") {
            config.library_path = library_path;
        }

        if let Ok(classifier_url) = env::var("CLONEPILOT_CLASSIFIER_URL") {
            config.classifier_url = classifier_url;
        }

        if let Ok(classifier_model) = env::var("CLONEPILOT_CLASSIFIER_MODEL") {
            config.classifier_model = classifier_model;
        }

        if let Ok(classifier_api_key) = env::var("CLONEPILOT_CLASSIFIER_API_KEY") {
            config.classifier_api_key = Some(classifier_api_key);
        }

        if let Ok(lookup_url) = env::var("CLONEPILOT_LOOKUP_URL") {
            config.lookup_url = lookup_url;
        }

        if let Ok(lookup_attempts) = env::var("CLONEPILOT_LOOKUP_ATTEMPTS") {
            if let Ok(attempts) = lookup_attempts.parse::<u32>() {
                config.lookup_attempts = attempts;
            } else {
                warn!("Invalid CLONEPILOT_LOOKUP_ATTEMPTS value: {}", lookup_attempts);
            }
        }

        if let Ok(delay) = env::var("CLONEPILOT_LOOKUP_RETRY_DELAY_MS") {
            if let Ok(ms) = delay.parse::<u64>() {
                config.lookup_retry_delay_ms = ms;
            } else {
                warn!("Invalid CLONEPILOT_LOOKUP_RETRY_DELAY_MS value: {}", delay);
            }
        }

        // Validate required fields
        if config.classifier_url.is_empty() {
            return Err(AdapterError::ConfigError(
                "Classifier URL is required".to_string(),
            ));
        }

        if config.lookup_url.is_empty() {
            return Err(AdapterError::ConfigError(
                "Lookup agent URL is required".to_string(),
            ));
        }

        // Warnings for missing optional fields
        if config.classifier_api_key.is_none() {
            warn!("No CLONEPILOT_CLASSIFIER_API_KEY provided - classifier requests will be unauthenticated");
        }

        info!("Loaded adapter configuration");
        Ok(config)
    }

    /// The lookup retry delay as a [`Duration`]
    pub fn lookup_retry_delay(&self) -> Duration {
        Duration::from_millis(self.lookup_retry_delay_ms)
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            library_path: default_library_path(),
            classifier_url: String::new(),
            classifier_model: default_classifier_model(),
            classifier_api_key: None,
            lookup_url: String::new(),
            lookup_attempts: default_lookup_attempts(),
            lookup_retry_delay_ms: default_lookup_retry_delay_ms(),
        }
    }
}
