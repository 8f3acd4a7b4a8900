//! Best-effort identification of an unnamed gene insert.
//!
//! Users often paste a sequence without saying what it is. Before the final
//! construct is rendered, a placeholder-named insert that is long enough to
//! be identifiable is sent through one extra classifier call. Only a
//! high- or medium-confidence answer replaces the placeholder; anything
//! else, including a classifier outage, leaves the insert labelled
//! [`UNIDENTIFIED_GENE`]. Identification never blocks the construct.

use tracing::{debug, warn};

use clonepilot_core::Classifier;

use crate::prompts;
use crate::views::{Confidence, IdentificationReply};

/// Inserts at or below this length are not worth an identification call
pub const IDENTIFICATION_MIN_LEN: usize = 50;

/// The sequence is truncated to this many bases for the prompt
pub const IDENTIFICATION_PROMPT_LEN: usize = 2000;

/// Label used when identification fails or is skipped on a placeholder name
pub const UNIDENTIFIED_GENE: &str = "unidentified gene";

/// Placeholder names that do not identify a gene
const GENERIC_GENE_NAMES: [&str; 9] = [
    "gene of interest",
    "my gene",
    "the gene",
    "gene",
    "goi",
    "insert",
    "custom gene",
    "unknown",
    "unidentified gene",
];

/// Whether a recorded gene name is a placeholder rather than a real name
pub fn is_generic_name(name: &str) -> bool {
    let lowered = name.trim().to_lowercase();
    lowered.is_empty() || GENERIC_GENE_NAMES.contains(&lowered.as_str())
}

/// Whether an insert qualifies for the identification call
pub fn needs_identification(name: &str, sequence: &str) -> bool {
    is_generic_name(name) && sequence.len() > IDENTIFICATION_MIN_LEN
}

/// An accepted identification answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub name: String,
    pub organism: String,
    pub confidence: Confidence,
}

/// Ask the classifier what a sequence encodes
///
/// Returns `None` for low confidence, an empty name, or any classifier
/// failure; the caller falls back to [`UNIDENTIFIED_GENE`].
pub async fn identify_gene(classifier: &dyn Classifier, sequence: &str) -> Option<Identification> {
    let truncated = &sequence[..sequence.len().min(IDENTIFICATION_PROMPT_LEN)];
    let prompt = prompts::fill(prompts::GENE_IDENTIFY_CLASSIFY, &[("sequence", truncated)]);

    let payload = match classifier.classify(&prompt).await {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "gene identification call failed");
            return None;
        }
    };

    let view = IdentificationReply::from_payload(&payload);
    let name = view.gene_name.trim();
    match view.confidence {
        Confidence::High | Confidence::Medium if !name.is_empty() => {
            debug!(gene = name, organism = %view.organism, "insert identified");
            Some(Identification {
                name: name.to_string(),
                organism: view.organism.trim().to_string(),
                confidence: view.confidence,
            })
        }
        _ => {
            debug!("identification answer discarded");
            None
        }
    }
}
