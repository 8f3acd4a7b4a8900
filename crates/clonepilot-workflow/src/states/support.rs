//! Helpers shared by the concrete states.

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use clonepilot_assembly::{is_valid_dna, SequenceRecord, MIN_BACKBONE_LEN};
use clonepilot_core::{CollaboratorError, LookupQuery, SequenceLookup};

/// Shortest pasted run accepted as a gene insert; anything shorter is more
/// likely prose than DNA
pub(crate) const MIN_GENE_LEN: usize = 10;

/// The curated backbone options, with the blurb shown next to each
pub(crate) const CURATED_BACKBONES: [(&str, &str); 2] = [
    (
        "pcDNA3.1(+)",
        "CMV promoter, ampicillin resistance, pBR322 origin; general mammalian expression",
    ),
    (
        "pAG",
        "SV40 promoter, neomycin/kanamycin resistance; mammalian lines under G418 selection",
    ),
];

/// Numbered markdown list of the curated options
pub(crate) fn curated_options_block() -> String {
    CURATED_BACKBONES
        .iter()
        .enumerate()
        .map(|(index, (name, blurb))| format!("{}. **{}**: {}", index + 1, name, blurb))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map a classifier-reported name onto the curated option it refers to
pub(crate) fn curated_canonical(name: &str) -> Option<&'static str> {
    let wanted = name.trim();
    CURATED_BACKBONES
        .iter()
        .find(|(curated, _)| curated.eq_ignore_ascii_case(wanted))
        .map(|(curated, _)| *curated)
}

/// Check a candidate backbone sequence, returning the user-facing reason
/// when it is not usable
pub(crate) fn validate_backbone(sequence: &str) -> Result<(), String> {
    if sequence.is_empty() {
        return Err("no DNA sequence was found".to_string());
    }
    if !is_valid_dna(sequence) {
        return Err("the sequence contains characters outside A/C/G/T".to_string());
    }
    if sequence.len() <= MIN_BACKBONE_LEN {
        return Err(format!(
            "the sequence is only {} bases long; a plasmid backbone needs more than {}",
            sequence.len(),
            MIN_BACKBONE_LEN
        ));
    }
    Ok(())
}

/// Whether a lookup hit's name disagrees with what was asked for
///
/// A case-insensitive substring match in either direction counts as
/// agreement, so "GFP" and "eGFP" are the same request.
pub(crate) fn names_mismatch(requested: &str, found: &str) -> bool {
    let requested = requested.trim().to_lowercase();
    let found = found.trim().to_lowercase();
    !(requested.contains(&found) || found.contains(&requested))
}

/// Render a classification turn in the standard selection shape
pub(crate) fn selection_block(summary: &str, reasoning: &str) -> String {
    let reasoning = reasoning.trim();
    if reasoning.is_empty() {
        format!("**Selection made**\n\n{summary}")
    } else {
        format!("**Selection made**\n\n{summary}\n\n**Reasoning:** {reasoning}")
    }
}

/// Call the lookup agent with a bounded number of attempts
///
/// A definitive answer (`Ok`, found or not) returns immediately; transport
/// failures are retried after a fixed delay until the budget runs out, then
/// the last failure is returned for the state to degrade on.
pub(crate) async fn lookup_with_retries(
    lookup: &dyn SequenceLookup,
    query: &LookupQuery,
    attempts: u32,
    delay: Duration,
) -> Result<Option<SequenceRecord>, CollaboratorError> {
    let attempts = attempts.max(1);
    let mut last_error: Option<CollaboratorError> = None;

    for attempt in 1..=attempts {
        match lookup.lookup(query).await {
            Ok(outcome) => return Ok(outcome),
            Err(err) => {
                warn!(
                    attempt,
                    attempts,
                    kind = query.kind.as_str(),
                    name = %query.name,
                    error = %err,
                    "sequence lookup attempt failed"
                );
                last_error = Some(err);
                if attempt < attempts {
                    sleep(delay).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        CollaboratorError::Unavailable("lookup produced no outcome".to_string())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clonepilot_test_utils::{record, ScriptedLookup};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_curated_options_block_lists_both() {
        let block = curated_options_block();
        assert!(block.contains("1. **pcDNA3.1(+)**"));
        assert!(block.contains("2. **pAG**"));
        assert!(block.contains("CMV promoter"));
    }

    #[test]
    fn test_curated_canonical_is_case_insensitive() {
        assert_eq!(curated_canonical("pcdna3.1(+)"), Some("pcDNA3.1(+)"));
        assert_eq!(curated_canonical(" PAG "), Some("pAG"));
        assert_eq!(curated_canonical("pUC19"), None);
        assert_eq!(curated_canonical(""), None);
    }

    #[test]
    fn test_validate_backbone() {
        assert!(validate_backbone(&"ACGT".repeat(51)).is_ok());
        assert!(validate_backbone("").unwrap_err().contains("no DNA sequence"));
        assert!(validate_backbone(&"ACGX".repeat(51))
            .unwrap_err()
            .contains("outside A/C/G/T"));
        // Exactly 200 bases is still too short
        assert!(validate_backbone(&"ACGT".repeat(50))
            .unwrap_err()
            .contains("200"));
    }

    #[test]
    fn test_names_mismatch_substring_rule() {
        assert!(!names_mismatch("GFP", "eGFP"));
        assert!(!names_mismatch("eGFP", "GFP"));
        assert!(!names_mismatch("tp53", "TP53"));
        assert!(names_mismatch("GFP", "mCherry"));
    }

    #[test]
    fn test_selection_block_omits_empty_reasoning() {
        assert_eq!(
            selection_block("Backbone: pAG", ""),
            "**Selection made**\n\nBackbone: pAG"
        );
        assert_eq!(
            selection_block("Backbone: pAG", "user picked option 2"),
            "**Selection made**\n\nBackbone: pAG\n\n**Reasoning:** user picked option 2"
        );
    }

    #[tokio::test]
    async fn test_lookup_retries_until_definitive_answer() {
        let lookup = ScriptedLookup::with_replies(vec![
            Err(CollaboratorError::Transport("timeout".to_string())),
            Ok(Some(record("pUC19", "ACGTACGT"))),
        ]);

        let outcome =
            lookup_with_retries(&lookup, &LookupQuery::backbone("pUC19"), 3, Duration::ZERO)
                .await
                .unwrap();

        assert_eq!(outcome.unwrap().name, "pUC19");
        assert_eq!(lookup.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_not_found_is_not_retried() {
        let lookup = ScriptedLookup::with_replies(vec![Ok(None)]);

        let outcome =
            lookup_with_retries(&lookup, &LookupQuery::gene("GFP"), 3, Duration::ZERO)
                .await
                .unwrap();

        assert!(outcome.is_none());
        assert_eq!(lookup.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_exhausts_budget_and_returns_last_error() {
        let lookup = ScriptedLookup::with_replies(vec![
            Err(CollaboratorError::Transport("first".to_string())),
            Err(CollaboratorError::Transport("second".to_string())),
            Err(CollaboratorError::Unavailable("third".to_string())),
        ]);

        let err = lookup_with_retries(&lookup, &LookupQuery::gene("GFP"), 3, Duration::ZERO)
            .await
            .unwrap_err();

        assert!(matches!(err, CollaboratorError::Unavailable(_)));
        assert_eq!(lookup.queries().len(), 3);
    }
}
