use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AssemblyError;
use crate::sites::{find_promoter_motif, find_recognition_sites};

/// Bases skipped past a promoter hit before inserting
pub const PROMOTER_DOWNSTREAM_OFFSET: usize = 100;

/// How the insertion point was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertionMethod {
    /// Between the first two restriction-site hits
    Mcs,
    /// Downstream of a promoter-name hit
    AfterPromoter,
    /// Appended at the end of the backbone
    Concatenation,
    /// At a caller-supplied position
    CustomPosition,
}

impl InsertionMethod {
    /// Snake-case tag used in rendered output and recorded payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertionMethod::Mcs => "mcs",
            InsertionMethod::AfterPromoter => "after_promoter",
            InsertionMethod::Concatenation => "concatenation",
            InsertionMethod::CustomPosition => "custom_position",
        }
    }
}

impl std::fmt::Display for InsertionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A finished splice: the combined sequence plus how it was made
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insertion {
    /// Backbone with the gene spliced in
    pub sequence: String,

    /// 0-based offset where the gene begins
    pub position: usize,

    /// How the offset was chosen
    pub method: InsertionMethod,
}

/// Splice a gene into a backbone
///
/// With an explicit `insertion_point` the gene goes exactly there (clamped
/// to the backbone end). Otherwise the position is decided by a fixed
/// ladder:
///
/// 1. `mcs` - if at least two recognition-site hits exist and the window
///    between the first hit's end and the second hit's start is non-empty,
///    insert at the window's right edge (the second hit's start);
/// 2. `after_promoter` - if a promoter name occurs, insert
///    [`PROMOTER_DOWNSTREAM_OFFSET`] bases past it, clamped to the end;
/// 3. `concatenation` - append at the end of the backbone.
///
/// The splice itself is plain: `backbone[..pos] + gene + backbone[pos..]`.
/// Both inputs must be non-empty; nothing is ever invented to fill a gap.
pub fn insert_gene(
    backbone: &str,
    gene: &str,
    insertion_point: Option<usize>,
) -> Result<Insertion, AssemblyError> {
    if backbone.is_empty() {
        return Err(AssemblyError::EmptyBackbone);
    }
    if gene.is_empty() {
        return Err(AssemblyError::EmptyGene);
    }

    let (position, method) = match insertion_point {
        Some(requested) => {
            let clamped = requested.min(backbone.len());
            if clamped < requested {
                debug!(requested, clamped, "insertion point clamped to backbone end");
            }
            (clamped, InsertionMethod::CustomPosition)
        }
        None => choose_position(backbone),
    };

    debug!(
        method = %method,
        position,
        backbone_len = backbone.len(),
        gene_len = gene.len(),
        "splicing gene into backbone"
    );

    Ok(Insertion {
        sequence: format!("{}{}{}", &backbone[..position], gene, &backbone[position..]),
        position,
        method,
    })
}

fn choose_position(backbone: &str) -> (usize, InsertionMethod) {
    let sites = find_recognition_sites(backbone);
    if sites.len() >= 2 && sites[1].start > sites[0].end {
        return (sites[1].start, InsertionMethod::Mcs);
    }

    if let Some(promoter) = find_promoter_motif(backbone) {
        let position = (promoter.end + PROMOTER_DOWNSTREAM_OFFSET).min(backbone.len());
        return (position, InsertionMethod::AfterPromoter);
    }

    (backbone.len(), InsertionMethod::Concatenation)
}
