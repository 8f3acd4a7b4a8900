//! Fetches an insert sequence by gene name through the external lookup
//! agent.
//!
//! A hit whose name disagrees with what the user asked for is not used
//! silently: it is parked as a pending sequence and the mismatch state
//! asks the user what to do with it.

use async_trait::async_trait;
use serde_json::json;

use clonepilot_assembly::{is_valid_dna, SequenceRecord};
use clonepilot_core::{
    EngineError, LookupQuery, Payload, SessionMemory, StateId, StepContext, StepResult,
    Transition, WorkflowState,
};

use crate::fields::{recorded, reply};
use crate::ids;
use crate::prompts;
use crate::states::support;
use crate::WorkflowOptions;

/// Gene-by-name lookup
pub struct GeneLookup {
    options: WorkflowOptions,
}

impl GeneLookup {
    pub fn new(options: WorkflowOptions) -> Self {
        Self { options }
    }

    fn remembered_gene(memory: &SessionMemory) -> Option<String> {
        memory.field(
            &StateId::new(ids::GENE_CHOICE),
            recorded::REQUESTED_GENE_NAME,
        )
    }

    fn variants_hint(memory: &SessionMemory) -> String {
        let variants = memory
            .result(&StateId::new(ids::GENE_CHOICE))
            .map(|result| result.payload.items(recorded::SUGGESTED_VARIANTS))
            .unwrap_or_default();
        if variants.is_empty() {
            String::new()
        } else {
            format!(" You could try: {}.", variants.join(", "))
        }
    }
}

#[async_trait]
impl WorkflowState for GeneLookup {
    fn id(&self) -> StateId {
        StateId::new(ids::GENE_LOOKUP)
    }

    fn request_message(&self, memory: &SessionMemory) -> Option<String> {
        let hint = Self::remembered_gene(memory)
            .map(|name| format!(" You mentioned {name}."))
            .unwrap_or_default();
        Some(prompts::fill(prompts::GENE_LOOKUP_REQUEST, &[("hint", &hint)]))
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::GENE_LOOKUP),
            StateId::new(ids::GENE_CHOICE),
            StateId::new(ids::GENE_SEQUENCE),
            StateId::new(ids::GENE_MISMATCH),
            StateId::new(ids::CONSTRUCT_CONFIRM),
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
        let prompt = prompts::fill(prompts::GENE_NAME_CLASSIFY, &[("message", utterance)]);
        let reply_payload = ctx.services.classifier.classify(&prompt).await?;

        let mut name = reply_payload.text_or_empty(reply::TARGET_GENE);
        if name.is_empty() {
            name = Self::remembered_gene(ctx.memory).unwrap_or_default();
        }
        if name.is_empty() {
            return Ok((
                StepResult::error("I need the gene's name to fetch its sequence."),
                Transition::to(ids::GENE_LOOKUP),
            ));
        }

        let query = LookupQuery::gene(&name);
        let outcome = support::lookup_with_retries(
            ctx.services.lookup.as_ref(),
            &query,
            self.options.lookup_attempts,
            self.options.lookup_retry_delay,
        )
        .await;

        match outcome {
            Ok(Some(record)) => Ok(Self::accept_hit(&name, record)),
            Ok(None) => Ok((
                StepResult::error(format!(
                    "I could not find a sequence for '{name}'.{} You can also \
                     paste the sequence directly.",
                    Self::variants_hint(ctx.memory)
                )),
                Transition::to(ids::GENE_CHOICE),
            )),
            Err(_) => Ok((
                StepResult::error(
                    "The sequence lookup service is unavailable right now. Paste \
                     the insert sequence instead and we can keep going.",
                ),
                Transition::to(ids::GENE_SEQUENCE),
            )),
        }
    }
}

impl GeneLookup {
    fn accept_hit(requested: &str, record: SequenceRecord) -> (StepResult, Transition) {
        if !is_valid_dna(&record.sequence) {
            return (
                StepResult::error(format!(
                    "The sequence returned for {} is not clean DNA, so I will not \
                     use it. Let's try another name.",
                    record.name
                )),
                Transition::to(ids::GENE_CHOICE),
            );
        }

        if support::names_mismatch(requested, &record.name) {
            // The mismatch state's own request presents the hit; an empty
            // response here keeps it from being printed twice in one turn.
            let payload = Payload::new()
                .with(recorded::REQUESTED_GENE_NAME, json!(requested))
                .with(recorded::PENDING_GENE_NAME, json!(record.name))
                .with(recorded::PENDING_GENE_SEQUENCE, json!(record.sequence));
            return (
                StepResult::success("").with_payload(payload),
                Transition::to(ids::GENE_MISMATCH),
            );
        }

        let payload = Payload::new()
            .with(recorded::GENE_NAME, json!(record.name))
            .with(recorded::GENE_SEQUENCE, json!(record.sequence));
        let response = format!("**Insert found**\n\n{} ({} bp)", record.name, record.len());
        (
            StepResult::success(response).with_payload(payload),
            Transition::to(ids::CONSTRUCT_CONFIRM),
        )
    }
}
