use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use clonepilot_assembly::SequenceRecord;

use crate::error::CollaboratorError;
use crate::types::Payload;

/// What kind of sequence a lookup is after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupKind {
    /// A plasmid backbone
    Backbone,
    /// A gene insert
    Gene,
}

impl LookupKind {
    /// Lower-case label used on the wire and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Backbone => "backbone",
            LookupKind::Gene => "gene",
        }
    }
}

/// A named sequence request sent to the external lookup agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupQuery {
    /// The name the user gave
    pub name: String,

    /// Whether the name refers to a backbone or a gene
    pub kind: LookupKind,
}

impl LookupQuery {
    /// Query for a plasmid backbone by name
    pub fn backbone(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LookupKind::Backbone,
        }
    }

    /// Query for a gene by name
    pub fn gene(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LookupKind::Gene,
        }
    }
}

/// Classification service: turns a filled prompt into a field map
///
/// The reply must be one flat JSON object; [`Payload`] handles tolerant
/// field access on top of it. Implementations never invent fields the
/// service did not return.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a filled prompt into a payload
    async fn classify(&self, prompt: &str) -> Result<Payload, CollaboratorError>;
}

/// Local sequence library: curated backbones and known inserts
#[async_trait]
pub trait SequenceRepository: Send + Sync {
    /// Find a record by name, case-insensitively; `None` when unknown or
    /// when the stored sequence is empty
    async fn find_by_name(&self, name: &str) -> Result<Option<SequenceRecord>, CollaboratorError>;

    /// List every record in the library
    async fn list(&self) -> Result<Vec<SequenceRecord>, CollaboratorError>;
}

/// External sequence lookup agent
///
/// `Ok(None)` is a definitive miss; an `Err` means the agent itself could
/// not be reached or answered garbage. Callers own retry policy. A record
/// is never fabricated: absence comes back as `None`, not as a made-up
/// sequence.
#[async_trait]
pub trait SequenceLookup: Send + Sync {
    /// Resolve a named sequence, or `None` when the agent finds nothing
    async fn lookup(&self, query: &LookupQuery)
        -> Result<Option<SequenceRecord>, CollaboratorError>;
}

/// The collaborator handles every state can reach during a step
#[derive(Clone)]
pub struct Services {
    /// Free-text classification
    pub classifier: Arc<dyn Classifier>,

    /// Local curated library
    pub repository: Arc<dyn SequenceRepository>,

    /// External lookup agent
    pub lookup: Arc<dyn SequenceLookup>,
}

impl Services {
    /// Bundle the three collaborator handles
    pub fn new(
        classifier: Arc<dyn Classifier>,
        repository: Arc<dyn SequenceRepository>,
        lookup: Arc<dyn SequenceLookup>,
    ) -> Self {
        Self {
            classifier,
            repository,
            lookup,
        }
    }
}
