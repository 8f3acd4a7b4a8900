//! Builders for payloads and sequence fixtures.
//!
//! The synthetic sequences are hand-checked against the enzyme catalogue:
//! the backbone carries exactly one EcoRI site and one BamHI site (in that
//! order, with a gap), and the gene contains no catalogue site at all, so
//! insertion-point assertions stay stable if the catalogue grows.

use serde_json::Value;

use clonepilot_assembly::SequenceRecord;
use clonepilot_core::Payload;

/// Build a payload from field/value pairs
pub fn payload_of(fields: &[(&str, Value)]) -> Payload {
    let mut payload = Payload::new();
    for (field, value) in fields {
        payload = payload.with(field, value.clone());
    }
    payload
}

/// Build an unannotated sequence record
pub fn record(name: &str, sequence: &str) -> SequenceRecord {
    SequenceRecord::new(name, sequence)
}

/// A 248 bp backbone with a usable two-site cloning region
///
/// Layout: 220 bp of `ATGC` repeats, then `GAATTC` (EcoRI, 220..226),
/// `TTTT`, `GGATCC` (BamHI, 230..236), and a 12 bp tail. Multiple-cloning-
/// site insertion therefore lands at position 230.
pub fn synthetic_backbone() -> SequenceRecord {
    let sequence = format!("{}GAATTCTTTTGGATCCACGTACGTACGT", "ATGC".repeat(55));
    SequenceRecord {
        name: "pSynth".to_string(),
        sequence,
        promoter: Some("CMV".to_string()),
        selection_marker: Some("Ampicillin".to_string()),
        origin: Some("pUC".to_string()),
    }
}

/// An 84 bp eGFP 5' fragment, free of catalogue recognition sites
pub fn synthetic_gene() -> SequenceRecord {
    SequenceRecord::new(
        "eGFP",
        "ATGGTGAGCAAGGGCGAGGAGCTGTTCACCGGGGTGGTGCCCATCCTGGTCGAGCTGGACGGCGACGTAAACGGCCACAAGTTC",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clonepilot_assembly::{find_recognition_sites, is_valid_dna, MIN_BACKBONE_LEN};
    use serde_json::json;

    #[test]
    fn test_payload_of() {
        let payload = payload_of(&[("Choice", json!("CURATED")), ("Confirmed", json!(true))]);
        assert_eq!(payload.text("Choice"), Some("CURATED"));
        assert!(payload.flag("Confirmed"));
    }

    #[test]
    fn test_synthetic_backbone_shape() {
        let backbone = synthetic_backbone();
        assert_eq!(backbone.len(), 248);
        assert!(backbone.len() > MIN_BACKBONE_LEN);
        assert!(is_valid_dna(&backbone.sequence));

        let sites = find_recognition_sites(&backbone.sequence);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].name, "EcoRI");
        assert_eq!(sites[0].start, 220);
        assert_eq!(sites[1].name, "BamHI");
        assert_eq!(sites[1].start, 230);
    }

    #[test]
    fn test_synthetic_gene_is_site_free() {
        let gene = synthetic_gene();
        assert_eq!(gene.len(), 84);
        assert!(is_valid_dna(&gene.sequence));
        assert!(find_recognition_sites(&gene.sequence).is_empty());
    }
}
