//! Resolving the working backbone and insert out of session memory.
//!
//! Several states can establish a backbone or a gene, and the modify loop
//! lets a later state supersede an earlier one. Resolution therefore scans
//! the fixed set of source states and takes the most recently recorded
//! successful entry that actually carries a sequence; on a timestamp tie
//! the custom-sequence source wins. Entries that never verified a sequence
//! simply do not carry the sequence field and are skipped.

use chrono::{DateTime, Utc};
use clonepilot_core::{SessionMemory, StateId, StepStatus};

use crate::fields::recorded;
use crate::ids;

/// Name shown when a backbone was recorded without one
pub const FALLBACK_BACKBONE_NAME: &str = "custom backbone";

/// Name shown when an insert was recorded without one
pub const FALLBACK_GENE_NAME: &str = "gene of interest";

/// States whose entries may carry an established backbone
const BACKBONE_SOURCES: [&str; 4] = [
    ids::BACKBONE_SEQUENCE,
    ids::BACKBONE_LOOKUP,
    ids::BACKBONE_RECOMMEND,
    ids::BACKBONE_METHOD,
];

/// States whose entries may carry an established insert
const GENE_SOURCES: [&str; 3] = [ids::GENE_SEQUENCE, ids::GENE_LOOKUP, ids::GENE_MISMATCH];

/// A named sequence pulled back out of memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSequence {
    /// Display name, never empty
    pub name: String,

    /// The established sequence, never empty
    pub sequence: String,
}

/// The backbone the conversation has settled on, if any
pub fn resolve_backbone(memory: &SessionMemory) -> Option<ResolvedSequence> {
    resolve_from(
        memory,
        &BACKBONE_SOURCES,
        recorded::BACKBONE_NAME,
        recorded::BACKBONE_SEQUENCE,
        FALLBACK_BACKBONE_NAME,
    )
}

/// The insert the conversation has settled on, if any
pub fn resolve_gene(memory: &SessionMemory) -> Option<ResolvedSequence> {
    resolve_from(
        memory,
        &GENE_SOURCES,
        recorded::GENE_NAME,
        recorded::GENE_SEQUENCE,
        FALLBACK_GENE_NAME,
    )
}

fn resolve_from(
    memory: &SessionMemory,
    sources: &[&str],
    name_field: &str,
    sequence_field: &str,
    fallback_name: &str,
) -> Option<ResolvedSequence> {
    let mut best: Option<(DateTime<Utc>, ResolvedSequence)> = None;

    for source in sources {
        let id = StateId::new(*source);
        let Some(entry) = memory.entry(&id) else {
            continue;
        };
        if entry.result.status != StepStatus::Success {
            continue;
        }
        let sequence = entry.result.payload.text_or_empty(sequence_field);
        if sequence.is_empty() {
            continue;
        }

        // Strictly-newer comparison: on a tie the earlier source in the
        // list (the custom-sequence state) keeps the slot.
        if best
            .as_ref()
            .map_or(true, |(recorded_at, _)| entry.recorded_at > *recorded_at)
        {
            let name = {
                let raw = entry.result.payload.text_or_empty(name_field);
                if raw.is_empty() {
                    fallback_name.to_string()
                } else {
                    raw
                }
            };
            best = Some((entry.recorded_at, ResolvedSequence { name, sequence }));
        }
    }

    best.map(|(_, resolved)| resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clonepilot_core::{Payload, StepResult};
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    fn backbone_entry(name: &str, sequence: &str) -> StepResult {
        StepResult::success("ok").with_payload(
            Payload::new()
                .with(recorded::BACKBONE_NAME, json!(name))
                .with(recorded::BACKBONE_SEQUENCE, json!(sequence)),
        )
    }

    fn gene_entry(name: &str, sequence: &str) -> StepResult {
        StepResult::success("ok").with_payload(
            Payload::new()
                .with(recorded::GENE_NAME, json!(name))
                .with(recorded::GENE_SEQUENCE, json!(sequence)),
        )
    }

    #[test]
    fn test_resolve_backbone_from_single_source() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::BACKBONE_METHOD),
            backbone_entry("pcDNA3.1(+)", "ACGTACGT"),
        );

        let resolved = resolve_backbone(&memory).unwrap();
        assert_eq!(resolved.name, "pcDNA3.1(+)");
        assert_eq!(resolved.sequence, "ACGTACGT");
    }

    #[test]
    fn test_resolve_skips_entries_without_sequence() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::BACKBONE_METHOD),
            StepResult::success("routing only")
                .with_payload(Payload::new().with(recorded::BACKBONE_NAME, json!("pUC19"))),
        );

        assert_eq!(resolve_backbone(&memory), None);
    }

    #[test]
    fn test_resolve_skips_error_entries() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::GENE_LOOKUP),
            StepResult::error("lookup failed").with_payload(
                Payload::new().with(recorded::GENE_SEQUENCE, json!("ATGGCC")),
            ),
        );

        assert_eq!(resolve_gene(&memory), None);
    }

    #[test]
    fn test_latest_recorded_gene_wins() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::GENE_SEQUENCE),
            gene_entry("first insert", "AAAATTTTCCCC"),
        );
        sleep(Duration::from_millis(5));
        memory.record(
            StateId::new(ids::GENE_LOOKUP),
            gene_entry("second insert", "GGGGCCCCAAAA"),
        );

        // The lookup entry was recorded later, so the modify loop's newer
        // choice supersedes the earlier paste
        let resolved = resolve_gene(&memory).unwrap();
        assert_eq!(resolved.name, "second insert");
        assert_eq!(resolved.sequence, "GGGGCCCCAAAA");
    }

    #[test]
    fn test_latest_recorded_custom_backbone_wins() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::BACKBONE_METHOD),
            backbone_entry("pAG", "TTTTTTTT"),
        );
        sleep(Duration::from_millis(5));
        memory.record(
            StateId::new(ids::BACKBONE_SEQUENCE),
            backbone_entry("my plasmid", "ACGTACGT"),
        );

        let resolved = resolve_backbone(&memory).unwrap();
        assert_eq!(resolved.name, "my plasmid");
    }

    #[test]
    fn test_missing_name_falls_back() {
        let mut memory = SessionMemory::new();
        memory.record(StateId::new(ids::GENE_SEQUENCE), gene_entry("", "ATGGCC"));

        let resolved = resolve_gene(&memory).unwrap();
        assert_eq!(resolved.name, FALLBACK_GENE_NAME);
    }

    #[test]
    fn test_empty_memory_resolves_nothing() {
        let memory = SessionMemory::new();
        assert_eq!(resolve_backbone(&memory), None);
        assert_eq!(resolve_gene(&memory), None);
    }
}
