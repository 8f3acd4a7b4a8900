//! Typed views over classifier reply payloads.
//!
//! Each view is built right after the classifier call and turns the loose
//! field map into the handful of typed values its state actually branches
//! on. Unknown or absent labels parse to an explicit `Unclear`-style
//! variant, so every branch in a state is spelled out rather than implied
//! by a missing key.

use clonepilot_assembly::OutputFormat;
use clonepilot_core::Payload;

use crate::fields::reply;

fn normalize_label(raw: &str) -> String {
    raw.trim().to_uppercase().replace([' ', '-'], "_")
}

/// How the user wants to provide the backbone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackboneChoice {
    /// One of the curated options
    Curated,
    /// They will paste their own sequence
    CustomSequence,
    /// They gave a name to fetch
    LookupByName,
    /// They described requirements and want a recommendation
    Recommend,
    /// The classifier could not tell
    Unclear,
}

impl BackboneChoice {
    pub fn parse(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "CURATED" => BackboneChoice::Curated,
            "CUSTOM_SEQUENCE" => BackboneChoice::CustomSequence,
            "LOOKUP_BY_NAME" => BackboneChoice::LookupByName,
            "RECOMMEND" => BackboneChoice::Recommend,
            _ => BackboneChoice::Unclear,
        }
    }
}

/// Reply to the backbone-method classification
#[derive(Debug, Clone)]
pub struct MethodReply {
    pub thoughts: String,
    pub choice: BackboneChoice,
    pub backbone_name: String,
}

impl MethodReply {
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            thoughts: payload.text_or_empty(reply::THOUGHTS),
            choice: BackboneChoice::parse(&payload.text_or_empty(reply::CHOICE)),
            backbone_name: payload.text_or_empty(reply::BACKBONE_NAME),
        }
    }
}

/// Reply to the custom-backbone extraction
#[derive(Debug, Clone)]
pub struct CustomBackboneReply {
    pub backbone_name: String,
    pub sequence_provided: bool,
    pub sequence_extracted: String,
    pub promoter: String,
    pub selection_marker: String,
    pub origin: String,
}

impl CustomBackboneReply {
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            backbone_name: payload.text_or_empty(reply::BACKBONE_NAME),
            sequence_provided: payload.flag(reply::SEQUENCE_PROVIDED),
            sequence_extracted: payload.text_or_empty(reply::SEQUENCE_EXTRACTED),
            promoter: payload.text_or_empty(reply::PROMOTER),
            selection_marker: payload.text_or_empty(reply::SELECTION_MARKER),
            origin: payload.text_or_empty(reply::ORIGIN),
        }
    }
}

/// Reply to the backbone recommendation
#[derive(Debug, Clone)]
pub struct RecommendReply {
    pub thoughts: String,
    pub backbone_name: String,
    pub details: String,
}

impl RecommendReply {
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            thoughts: payload.text_or_empty(reply::THOUGHTS),
            backbone_name: payload.text_or_empty(reply::BACKBONE_NAME),
            details: payload.text_or_empty(reply::DETAILS),
        }
    }
}

/// Reply to the insert-choice classification
#[derive(Debug, Clone)]
pub struct GeneChoiceReply {
    pub has_exact_sequence: bool,
    pub target_gene: String,
    pub sequence_provided: String,
    pub variants: Vec<String>,
    pub rationale: String,
}

impl GeneChoiceReply {
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            has_exact_sequence: payload.flag(reply::HAS_EXACT_SEQUENCE),
            target_gene: payload.text_or_empty(reply::TARGET_GENE),
            sequence_provided: payload.text_or_empty(reply::GENE_SEQUENCE_PROVIDED),
            variants: payload.items(reply::SUGGESTED_VARIANTS),
            rationale: payload.text_or_empty(reply::RATIONALE),
        }
    }
}

/// Confirm-or-modify decision at the construct summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmDecision {
    Proceed,
    Modify,
    Unclear,
}

impl ConfirmDecision {
    pub fn parse(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "PROCEED" => ConfirmDecision::Proceed,
            "MODIFY" => ConfirmDecision::Modify,
            _ => ConfirmDecision::Unclear,
        }
    }

    pub fn from_payload(payload: &Payload) -> Self {
        Self::parse(&payload.text_or_empty(reply::STATUS))
    }
}

/// Use-it-anyway decision after a mismatched lookup hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchDecision {
    Proceed,
    Retry,
    Unclear,
}

impl MismatchDecision {
    pub fn parse(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "PROCEED" => MismatchDecision::Proceed,
            "RETRY" => MismatchDecision::Retry,
            _ => MismatchDecision::Unclear,
        }
    }

    pub fn from_payload(payload: &Payload) -> Self {
        Self::parse(&payload.text_or_empty(reply::STATUS))
    }
}

/// Reply to the output-format classification
#[derive(Debug, Clone)]
pub struct FormatReply {
    pub thoughts: String,
    pub format: Option<OutputFormat>,
}

impl FormatReply {
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            thoughts: payload.text_or_empty(reply::THOUGHTS),
            format: OutputFormat::from_label(&payload.text_or_empty(reply::SELECTED_FORMAT)),
        }
    }
}

/// What the user wants after seeing the finished construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    Download,
    ModifyDesign,
    StartNewProject,
    /// Anything else ends the session
    Other,
}

impl NextAction {
    pub fn parse(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "DOWNLOAD_DESIGN" => NextAction::Download,
            "MODIFY_DESIGN" => NextAction::ModifyDesign,
            "START_NEW_PROJECT" => NextAction::StartNewProject,
            _ => NextAction::Other,
        }
    }

    pub fn from_payload(payload: &Payload) -> Self {
        Self::parse(&payload.text_or_empty(reply::NEXT_ACTION))
    }
}

/// Identification confidence reported by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn parse(raw: &str) -> Self {
        match normalize_label(raw).as_str() {
            "HIGH" => Confidence::High,
            "MEDIUM" => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

/// Reply to the gene-identification call
#[derive(Debug, Clone)]
pub struct IdentificationReply {
    pub gene_name: String,
    pub organism: String,
    pub confidence: Confidence,
    pub reasoning: String,
    pub alternatives: Vec<String>,
}

impl IdentificationReply {
    pub fn from_payload(payload: &Payload) -> Self {
        Self {
            gene_name: payload.text_or_empty(reply::GENE_NAME),
            organism: payload.text_or_empty(reply::ORGANISM),
            confidence: Confidence::parse(&payload.text_or_empty(reply::CONFIDENCE)),
            reasoning: payload.text_or_empty(reply::REASONING),
            alternatives: payload.items(reply::ALTERNATIVE_GENES),
        }
    }
}
