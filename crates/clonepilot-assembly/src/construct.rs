use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;
use crate::insert::{insert_gene, InsertionMethod};
use crate::sequence::SequenceRecord;

/// The finished expression construct
///
/// Produced once per assembly and never mutated; a changed design is a new
/// construct derived from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construct {
    /// Backbone with the gene spliced in
    pub final_sequence: String,

    /// 0-based offset where the gene begins
    pub insertion_position: usize,

    /// How the insertion point was chosen
    pub method: InsertionMethod,

    /// Name of the inserted gene
    pub gene_name: String,

    /// Name of the backbone
    pub backbone_name: String,

    /// When the construct was assembled
    pub created_at: DateTime<Utc>,
}

impl Construct {
    /// Splice `gene` into `backbone` and bind the names to the result
    pub fn assemble(
        backbone: &SequenceRecord,
        gene: &SequenceRecord,
        insertion_point: Option<usize>,
    ) -> Result<Self, AssemblyError> {
        let insertion = insert_gene(&backbone.sequence, &gene.sequence, insertion_point)?;
        Ok(Self {
            final_sequence: insertion.sequence,
            insertion_position: insertion.position,
            method: insertion.method,
            gene_name: gene.name.clone(),
            backbone_name: backbone.name.clone(),
            created_at: Utc::now(),
        })
    }

    /// Total length of the construct in bases
    #[inline]
    pub fn len(&self) -> usize {
        self.final_sequence.len()
    }

    /// Whether the construct carries no sequence (cannot happen for an
    /// assembled construct; kept for the len/is_empty pairing)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.final_sequence.is_empty()
    }
}
