use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A backbone must be longer than this to count as resolved
pub const MIN_BACKBONE_LEN: usize = 200;

static DNA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ACGT]+").expect("valid regex"));

/// A named DNA sequence, with the annotations the curated library carries
///
/// The sequence is stored upper-case over `{A,C,G,T}`. An empty sequence
/// means "not found": adapters return `None` instead of a record holding
/// one, and nothing downstream ever fills the gap with an invented
/// sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Display name (for example "pcDNA3.1(+)" or "GFP")
    pub name: String,

    /// Upper-case nucleotide sequence
    pub sequence: String,

    /// Promoter annotation, when known
    #[serde(default)]
    pub promoter: Option<String>,

    /// Selection-marker annotation, when known
    #[serde(default)]
    pub selection_marker: Option<String>,

    /// Origin-of-replication annotation, when known
    #[serde(default)]
    pub origin: Option<String>,
}

impl SequenceRecord {
    /// Create an unannotated record, sanitizing the sequence
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sequence: sanitize_sequence(&sequence.into()),
            promoter: None,
            selection_marker: None,
            origin: None,
        }
    }

    /// Length of the sequence in bases
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the record carries no sequence
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Upper-case a sequence and drop whitespace
///
/// This is the only normalization applied to user- or library-supplied
/// sequences; anything that still fails [`is_valid_dna`] afterwards is
/// rejected rather than repaired.
pub fn sanitize_sequence(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Whether a sequence is non-empty and drawn from `{A,C,G,T}` only
pub fn is_valid_dna(sequence: &str) -> bool {
    !sequence.is_empty() && sequence.chars().all(|c| matches!(c, 'A' | 'C' | 'G' | 'T'))
}

/// Pull the longest plausible DNA stretch out of free text
///
/// Upper-cases the text and returns the longest `[ACGT]+` run; the first
/// such run wins a length tie. Used to fish a pasted sequence out of a
/// chat message that also contains prose.
pub fn longest_dna_run(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    let mut best: Option<&str> = None;
    for m in DNA_RUN.find_iter(&upper) {
        let candidate = m.as_str();
        if best.map_or(true, |current| candidate.len() > current.len()) {
            best = Some(candidate);
        }
    }
    best.map(|s| s.to_string())
}
