//! Production collaborator adapters for Clonepilot
//!
//! The conversation engine talks to three collaborators through traits in
//! `clonepilot-core`: a classifier, a curated sequence library and an
//! external lookup agent. This crate carries the deployable implementations:
//!
//! - [`CsvSequenceLibrary`]: the curated library, loaded from a CSV file
//! - [`AgentLookupClient`]: the lookup agent, spoken to over HTTP with a
//!   sentinel-delimited JSON reply contract
//! - [`HttpClassifier`]: classification via an OpenAI-style
//!   chat-completions endpoint
//!
//! [`AdapterConfig`] reads the deployment's settings from `CLONEPILOT_*`
//! environment variables, and [`build_services`] wires everything into the
//! `Services` bundle the session driver expects.

#![forbid(unsafe_code)]

pub mod agent;
pub mod classifier;
pub mod config;
pub mod error;
pub mod library;

pub use agent::{extract_delimited_json, AgentLookupClient, JSON_BEGIN, JSON_END};
pub use classifier::HttpClassifier;
pub use config::AdapterConfig;
pub use error::AdapterError;
pub use library::CsvSequenceLibrary;

use std::sync::Arc;

use clonepilot_core::Services;

/// Wire the production adapters into a [`Services`] bundle
///
/// Loads the curated library eagerly so a bad path or file fails at startup
/// rather than mid-conversation.
pub fn build_services(config: &AdapterConfig) -> Result<Services, AdapterError> {
    let library = CsvSequenceLibrary::from_path(&config.library_path)?;
    let classifier = HttpClassifier::new(
        &config.classifier_url,
        &config.classifier_model,
        config.classifier_api_key.clone(),
    );
    let lookup = AgentLookupClient::new(&config.lookup_url);

    Ok(Services::new(
        Arc::new(classifier),
        Arc::new(library),
        Arc::new(lookup),
    ))
}
