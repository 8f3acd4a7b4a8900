//! The plasmid-design conversation: concrete states wired into a
//! validated workflow graph.
//!
//! The conversation runs in three phases. Backbone acquisition offers
//! four routes (curated pick, pasted sequence, lookup by name,
//! recommendation), insert acquisition offers two (pasted sequence,
//! lookup by name with a mismatch review), and the closing phase
//! confirms the design, assembles and renders the construct, then
//! offers a modify loop or a fresh start. [`standard_registry`] builds
//! the whole graph; the driver in `clonepilot-core` runs it.

#![forbid(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use clonepilot_core::{EngineError, StateId, StateRegistry};

pub mod fields;
pub mod identify;
pub mod prompts;
pub mod resolve;
pub mod states;
pub mod views;

pub use resolve::{resolve_backbone, resolve_gene, ResolvedSequence};
pub use states::{
    BackboneLookup, BackboneMethod, BackboneRecommend, BackboneSequence, ConstructConfirm,
    Entry, FinalSummary, GeneChoice, GeneLookup, GeneMismatch, GeneSequence,
    OutputFormatSelection,
};

/// State ids, as recorded in session memory and shown in logs.
pub mod ids {
    pub const ENTRY: &str = "entry";
    pub const BACKBONE_METHOD: &str = "backbone_method";
    pub const BACKBONE_SEQUENCE: &str = "backbone_sequence";
    pub const BACKBONE_LOOKUP: &str = "backbone_lookup";
    pub const BACKBONE_RECOMMEND: &str = "backbone_recommend";
    pub const GENE_CHOICE: &str = "gene_choice";
    pub const GENE_SEQUENCE: &str = "gene_sequence";
    pub const GENE_LOOKUP: &str = "gene_lookup";
    pub const GENE_MISMATCH: &str = "gene_mismatch";
    pub const CONSTRUCT_CONFIRM: &str = "construct_confirm";
    pub const OUTPUT_FORMAT: &str = "output_format";
    pub const FINAL_SUMMARY: &str = "final_summary";
}

/// Tunables for the states that call the external lookup agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Lookup attempts before the outage route is taken
    pub lookup_attempts: u32,

    /// Pause between lookup attempts
    pub lookup_retry_delay: Duration,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            lookup_attempts: 3,
            lookup_retry_delay: Duration::from_millis(500),
        }
    }
}

/// The full plasmid-design workflow with default options
pub fn standard_registry() -> Result<StateRegistry, EngineError> {
    standard_registry_with(WorkflowOptions::default())
}

/// The full plasmid-design workflow
pub fn standard_registry_with(options: WorkflowOptions) -> Result<StateRegistry, EngineError> {
    let mut registry = StateRegistry::new(StateId::new(ids::ENTRY));
    registry.register(Arc::new(Entry))?;
    registry.register(Arc::new(BackboneMethod))?;
    registry.register(Arc::new(BackboneSequence))?;
    registry.register(Arc::new(BackboneLookup::new(options.clone())))?;
    registry.register(Arc::new(BackboneRecommend))?;
    registry.register(Arc::new(GeneChoice))?;
    registry.register(Arc::new(GeneSequence))?;
    registry.register(Arc::new(GeneLookup::new(options)))?;
    registry.register(Arc::new(GeneMismatch))?;
    registry.register(Arc::new(ConstructConfirm))?;
    registry.register(Arc::new(OutputFormatSelection))?;
    registry.register(Arc::new(FinalSummary))?;
    registry.validate()?;
    Ok(registry)
}
