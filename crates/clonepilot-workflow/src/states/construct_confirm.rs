//! Shows the design so far and asks for a go / modify decision.

use async_trait::async_trait;

use clonepilot_core::{
    EngineError, SessionMemory, StateId, StepContext, StepResult, Transition, WorkflowState,
};

use crate::ids;
use crate::prompts;
use crate::resolve::{resolve_backbone, resolve_gene};
use crate::views::ConfirmDecision;

/// Pre-assembly confirmation gate
pub struct ConstructConfirm;

#[async_trait]
impl WorkflowState for ConstructConfirm {
    fn id(&self) -> StateId {
        StateId::new(ids::CONSTRUCT_CONFIRM)
    }

    fn request_message(&self, memory: &SessionMemory) -> Option<String> {
        match (resolve_backbone(memory), resolve_gene(memory)) {
            (Some(backbone), Some(gene)) => Some(prompts::fill(
                prompts::CONSTRUCT_CONFIRM_REQUEST,
                &[
                    ("backbone", &backbone.name),
                    ("backbone_len", &backbone.sequence.len().to_string()),
                    ("gene", &gene.name),
                    ("gene_len", &gene.sequence.len().to_string()),
                ],
            )),
            _ => Some(prompts::CONSTRUCT_CONFIRM_REQUEST_BARE.to_string()),
        }
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::CONSTRUCT_CONFIRM),
            StateId::new(ids::OUTPUT_FORMAT),
            StateId::new(ids::GENE_CHOICE),
        ]
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(prompts::CONSTRUCT_CONFIRM_CLASSIFY, &[("message", utterance)]);
        let reply = ctx.services.classifier.classify(&prompt).await?;

        match ConfirmDecision::from_payload(&reply) {
            ConfirmDecision::Proceed => Ok((
                StepResult::success("Design confirmed."),
                Transition::to(ids::OUTPUT_FORMAT),
            )),
            ConfirmDecision::Modify => Ok((
                StepResult::success("Okay, let's adjust the insert."),
                Transition::to(ids::GENE_CHOICE),
            )),
            ConfirmDecision::Unclear => Ok((
                StepResult::error(
                    "Shall I proceed to the output format, or would you like to \
                     modify the design?",
                ),
                Transition::to(ids::CONSTRUCT_CONFIRM),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clonepilot_core::Payload;
    use clonepilot_test_utils::{
        payload_of, scripted_services, synthetic_backbone, synthetic_gene, ScriptedClassifier,
        ScriptedLookup, StaticLibrary,
    };
    use serde_json::json;
    use std::sync::Arc;

    use crate::fields::recorded;

    fn designed_memory() -> SessionMemory {
        let backbone = synthetic_backbone();
        let gene = synthetic_gene();
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::BACKBONE_SEQUENCE),
            StepResult::success("").with_payload(payload_of(&[
                (recorded::BACKBONE_NAME, json!(backbone.name)),
                (recorded::BACKBONE_SEQUENCE, json!(backbone.sequence)),
            ])),
        );
        memory.record(
            StateId::new(ids::GENE_SEQUENCE),
            StepResult::success("").with_payload(payload_of(&[
                (recorded::GENE_NAME, json!(gene.name)),
                (recorded::GENE_SEQUENCE, json!(gene.sequence)),
            ])),
        );
        memory
    }

    async fn run(status: &str) -> (StepResult, Transition) {
        let classifier =
            ScriptedClassifier::with_replies(vec![payload_of(&[("Status", json!(status))])]);
        let services = scripted_services(
            Arc::new(classifier),
            StaticLibrary::new(),
            Arc::new(ScriptedLookup::new()),
        );
        let memory = designed_memory();
        ConstructConfirm
            .step("answer", StepContext { memory: &memory, services: &services })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_proceed_moves_to_output_format() {
        let (result, transition) = run("proceed").await;
        assert!(!result.is_error());
        assert_eq!(transition, Transition::to(ids::OUTPUT_FORMAT));
    }

    #[tokio::test]
    async fn test_modify_returns_to_insert_choice() {
        let (result, transition) = run("modify").await;
        assert!(!result.is_error());
        assert_eq!(transition, Transition::to(ids::GENE_CHOICE));
    }

    #[tokio::test]
    async fn test_unclear_loops() {
        let (result, transition) = run("unclear").await;
        assert!(result.is_error());
        assert_eq!(transition, Transition::to(ids::CONSTRUCT_CONFIRM));
    }

    #[tokio::test]
    async fn test_garbage_status_is_treated_as_unclear() {
        let classifier =
            ScriptedClassifier::with_replies(vec![Payload::new().with("Status", json!(42))]);
        let services = scripted_services(
            Arc::new(classifier),
            StaticLibrary::new(),
            Arc::new(ScriptedLookup::new()),
        );
        let memory = designed_memory();

        let (result, transition) = ConstructConfirm
            .step("??", StepContext { memory: &memory, services: &services })
            .await
            .unwrap();

        assert!(result.is_error());
        assert_eq!(transition, Transition::to(ids::CONSTRUCT_CONFIRM));
    }

    #[test]
    fn test_request_summarizes_the_design() {
        let request = ConstructConfirm.request_message(&designed_memory()).unwrap();
        assert!(request.contains("pSynth"));
        assert!(request.contains("248 bp"));
        assert!(request.contains("84 bp"));
    }

    #[test]
    fn test_request_without_sequences_is_bare() {
        let request = ConstructConfirm
            .request_message(&SessionMemory::new())
            .unwrap();
        assert!(!request.contains("Design so far"));
        assert!(request.contains("proceed"));
    }
}
