//! Accepts a pasted insert sequence.
//!
//! Inserts are held to a much looser bar than backbones: anything over
//! [`support::MIN_GENE_LEN`] bases of clean DNA is accepted, since short
//! tags and linkers are legitimate inserts.

use async_trait::async_trait;
use serde_json::json;

use clonepilot_assembly::longest_dna_run;
use clonepilot_core::{
    EngineError, Payload, SessionMemory, StateId, StepContext, StepResult, Transition,
    WorkflowState,
};

use crate::fields::{recorded, reply};
use crate::ids;
use crate::prompts;
use crate::resolve::FALLBACK_GENE_NAME;
use crate::states::support;

/// Pasted-insert capture
pub struct GeneSequence;

impl GeneSequence {
    fn remembered_gene(memory: &SessionMemory) -> Option<String> {
        memory.field(
            &StateId::new(ids::GENE_CHOICE),
            recorded::REQUESTED_GENE_NAME,
        )
    }
}

#[async_trait]
impl WorkflowState for GeneSequence {
    fn id(&self) -> StateId {
        StateId::new(ids::GENE_SEQUENCE)
    }

    fn request_message(&self, memory: &SessionMemory) -> Option<String> {
        let gene = Self::remembered_gene(memory).unwrap_or_else(|| "your gene".to_string());
        Some(prompts::fill(prompts::GENE_SEQUENCE_REQUEST, &[("gene", &gene)]))
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::GENE_SEQUENCE),
            StateId::new(ids::CONSTRUCT_CONFIRM),
        ]
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(prompts::GENE_SEQUENCE_CLASSIFY, &[("message", utterance)]);
        let reply_payload = ctx.services.classifier.classify(&prompt).await?;

        let sequence = longest_dna_run(utterance).unwrap_or_default();
        if sequence.is_empty() {
            return Ok((
                StepResult::error(
                    "I could not find a DNA sequence in that message. Paste the \
                     insert as plain A/C/G/T text.",
                ),
                Transition::to(ids::GENE_SEQUENCE),
            ));
        }
        if sequence.len() < support::MIN_GENE_LEN {
            return Ok((
                StepResult::error(format!(
                    "That sequence is only {} bases long, which is too short for \
                     an insert. Paste the full sequence.",
                    sequence.len()
                )),
                Transition::to(ids::GENE_SEQUENCE),
            ));
        }

        let mut name = reply_payload.text_or_empty(reply::TARGET_GENE);
        if name.is_empty() {
            name = Self::remembered_gene(ctx.memory)
                .unwrap_or_else(|| FALLBACK_GENE_NAME.to_string());
        }

        let payload = Payload::new()
            .with(recorded::GENE_NAME, json!(name))
            .with(recorded::GENE_SEQUENCE, json!(sequence));
        let response = format!("**Insert recorded**\n\n{name} ({} bp)", sequence.len());

        Ok((
            StepResult::success(response).with_payload(payload),
            Transition::to(ids::CONSTRUCT_CONFIRM),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clonepilot_test_utils::{
        payload_of, scripted_services, synthetic_gene, ScriptedClassifier, ScriptedLookup,
        StaticLibrary,
    };
    use std::sync::Arc;

    async fn run_with_memory(
        reply: clonepilot_core::Payload,
        utterance: &str,
        memory: &SessionMemory,
    ) -> (StepResult, Transition) {
        let classifier = ScriptedClassifier::with_replies(vec![reply]);
        let services = scripted_services(
            Arc::new(classifier),
            StaticLibrary::new(),
            Arc::new(ScriptedLookup::new()),
        );
        GeneSequence
            .step(utterance, StepContext { memory, services: &services })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pasted_insert_is_recorded() {
        let gene = synthetic_gene();
        let utterance = format!("here is eGFP: {}", gene.sequence);
        let memory = SessionMemory::new();

        let (result, transition) = run_with_memory(
            payload_of(&[("Target gene", json!("eGFP"))]),
            &utterance,
            &memory,
        )
        .await;

        assert!(!result.is_error());
        assert_eq!(transition, Transition::to(ids::CONSTRUCT_CONFIRM));
        assert_eq!(result.payload.text(recorded::GENE_NAME), Some("eGFP"));
        assert_eq!(
            result.payload.text(recorded::GENE_SEQUENCE),
            Some(gene.sequence.as_str())
        );
    }

    #[tokio::test]
    async fn test_name_falls_back_to_earlier_choice() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::GENE_CHOICE),
            StepResult::success("").with_payload(payload_of(&[(
                recorded::REQUESTED_GENE_NAME,
                json!("mCherry"),
            )])),
        );

        let (result, _) = run_with_memory(
            clonepilot_core::Payload::new(),
            &synthetic_gene().sequence,
            &memory,
        )
        .await;

        assert_eq!(result.payload.text(recorded::GENE_NAME), Some("mCherry"));
    }

    #[tokio::test]
    async fn test_unnamed_insert_gets_placeholder_name() {
        let memory = SessionMemory::new();
        let (result, _) = run_with_memory(
            clonepilot_core::Payload::new(),
            &synthetic_gene().sequence,
            &memory,
        )
        .await;

        assert_eq!(
            result.payload.text(recorded::GENE_NAME),
            Some(FALLBACK_GENE_NAME)
        );
    }

    #[tokio::test]
    async fn test_too_short_insert_loops() {
        let memory = SessionMemory::new();
        let (result, transition) =
            run_with_memory(clonepilot_core::Payload::new(), "ACGTACG", &memory).await;

        assert!(result.is_error());
        assert_eq!(transition, Transition::to(ids::GENE_SEQUENCE));
        assert!(result.response.contains("7 bases"));
    }

    #[tokio::test]
    async fn test_prose_without_dna_loops() {
        let memory = SessionMemory::new();
        let (result, transition) = run_with_memory(
            clonepilot_core::Payload::new(),
            "hold on, let me find it",
            &memory,
        )
        .await;

        assert!(result.is_error());
        assert_eq!(transition, Transition::to(ids::GENE_SEQUENCE));
    }

    #[test]
    fn test_request_names_the_remembered_gene() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::GENE_CHOICE),
            StepResult::success("").with_payload(payload_of(&[(
                recorded::REQUESTED_GENE_NAME,
                json!("eGFP"),
            )])),
        );

        let request = GeneSequence.request_message(&memory).unwrap();
        assert!(request.contains("eGFP"));

        let bare = GeneSequence.request_message(&SessionMemory::new()).unwrap();
        assert!(bare.contains("your gene"));
    }
}
