//! Asks whether the user has their insert sequence in hand or wants it
//! fetched by name.
//!
//! Only routing information is recorded here (the gene's name and any
//! variants mentioned); sequences are recorded by the states that
//! actually obtain them.

use async_trait::async_trait;
use serde_json::json;

use clonepilot_core::{
    EngineError, Payload, SessionMemory, StateId, StepContext, StepResult, Transition,
    WorkflowState,
};

use crate::fields::recorded;
use crate::ids;
use crate::prompts;
use crate::views::GeneChoiceReply;

/// Insert-source decision: paste the sequence or look it up
pub struct GeneChoice;

#[async_trait]
impl WorkflowState for GeneChoice {
    fn id(&self) -> StateId {
        StateId::new(ids::GENE_CHOICE)
    }

    fn request_message(&self, _memory: &SessionMemory) -> Option<String> {
        Some(prompts::GENE_CHOICE_REQUEST.to_string())
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::GENE_CHOICE),
            StateId::new(ids::GENE_SEQUENCE),
            StateId::new(ids::GENE_LOOKUP),
        ]
    }

    fn escalation(&self) -> Option<StateId> {
        Some(StateId::new(ids::GENE_SEQUENCE))
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(prompts::GENE_CHOICE_CLASSIFY, &[("message", utterance)]);
        let reply_payload = ctx.services.classifier.classify(&prompt).await?;
        let view = GeneChoiceReply::from_payload(&reply_payload);

        let mut payload = Payload::new();
        if !view.target_gene.is_empty() {
            payload.set(recorded::REQUESTED_GENE_NAME, json!(view.target_gene));
        }
        if !view.variants.is_empty() {
            payload.set(recorded::SUGGESTED_VARIANTS, json!(view.variants));
        }

        if view.has_exact_sequence {
            let response = if view.target_gene.is_empty() {
                "Great, paste the sequence and I will take it from there.".to_string()
            } else {
                format!(
                    "Great, paste the {} sequence and I will take it from there.",
                    view.target_gene
                )
            };
            return Ok((
                StepResult::success(response).with_payload(payload),
                Transition::to(ids::GENE_SEQUENCE),
            ));
        }

        if view.target_gene.is_empty() && view.variants.is_empty() {
            return Ok((
                StepResult::error(
                    "I could not tell which gene you want to insert. Name the gene, \
                     or paste its sequence directly.",
                ),
                Transition::to(ids::GENE_CHOICE),
            ));
        }

        let subject = if view.target_gene.is_empty() {
            view.variants.join(", ")
        } else {
            view.target_gene.clone()
        };
        Ok((
            StepResult::success(format!("Looking up {subject} for you."))
                .with_payload(payload)
                .with_rationale(view.rationale),
            Transition::to(ids::GENE_LOOKUP),
        ))
    }
}
