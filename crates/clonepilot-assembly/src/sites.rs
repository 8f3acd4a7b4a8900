use once_cell::sync::Lazy;
use regex::Regex;

/// The restriction enzymes scanned for a multiple-cloning-site window
///
/// Name and recognition motif, in catalogue order. Motifs are exact
/// upper-case strings; scanning is plain substring search on the sanitized
/// backbone.
pub const RECOGNITION_SITES: [(&str, &str); 10] = [
    ("EcoRI", "GAATTC"),
    ("BamHI", "GGATCC"),
    ("KpnI", "GGTACC"),
    ("XbaI", "TCTAGA"),
    ("SalI", "GTCGAC"),
    ("PstI", "CTGCAG"),
    ("NotI", "GCGGCCGC"),
    ("XhoI", "CTCGAG"),
    ("SmaI", "CCCGGG"),
    ("ApaI", "GGGCCC"),
];

static PROMOTER_MOTIF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CMV|SV40|EF1A|UBC").expect("valid regex"));

/// One recognition-site hit on a backbone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMatch {
    /// Enzyme name from the catalogue
    pub name: &'static str,

    /// Start offset of the motif, 0-based
    pub start: usize,

    /// End offset of the motif (exclusive)
    pub end: usize,
}

/// A promoter-name hit on a backbone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoterMatch {
    /// The promoter name that matched
    pub name: String,

    /// Start offset of the name, 0-based
    pub start: usize,

    /// End offset of the name (exclusive)
    pub end: usize,
}

/// Scan a backbone for every catalogue motif occurrence
///
/// All enzymes and all occurrences are collected, then ordered by start
/// offset (ties by end, then name) so the caller can reason about the
/// leftmost window.
pub fn find_recognition_sites(backbone: &str) -> Vec<SiteMatch> {
    let mut matches: Vec<SiteMatch> = Vec::new();
    for (name, motif) in RECOGNITION_SITES {
        for (start, _) in backbone.match_indices(motif) {
            matches.push(SiteMatch {
                name,
                start,
                end: start + motif.len(),
            });
        }
    }
    matches.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then(a.name.cmp(b.name))
    });
    matches
}

/// Find the leftmost promoter-name occurrence (CMV, SV40, EF1A, UBC)
pub fn find_promoter_motif(backbone: &str) -> Option<PromoterMatch> {
    PROMOTER_MOTIF.find(backbone).map(|m| PromoterMatch {
        name: m.as_str().to_string(),
        start: m.start(),
        end: m.end(),
    })
}
