//! Resolves a lookup hit whose name disagrees with what the user asked
//! for.
//!
//! The pending sequence parked by the lookup state is only committed as
//! the insert if the user explicitly says to use it; "retry" discards it
//! and goes back to the lookup.

use async_trait::async_trait;
use serde_json::json;

use clonepilot_core::{
    EngineError, Payload, SessionMemory, StateId, StepContext, StepResult, Transition,
    WorkflowState,
};

use crate::fields::recorded;
use crate::ids;
use crate::prompts;
use crate::views::MismatchDecision;

/// Use-it-anyway review of a mismatched lookup hit
pub struct GeneMismatch;

impl GeneMismatch {
    fn pending(memory: &SessionMemory) -> Option<(String, String)> {
        let lookup = StateId::new(ids::GENE_LOOKUP);
        let name = memory.field(&lookup, recorded::PENDING_GENE_NAME)?;
        let sequence = memory.field(&lookup, recorded::PENDING_GENE_SEQUENCE)?;
        Some((name, sequence))
    }

    fn requested(memory: &SessionMemory) -> String {
        memory
            .field(&StateId::new(ids::GENE_LOOKUP), recorded::REQUESTED_GENE_NAME)
            .unwrap_or_else(|| "your gene".to_string())
    }
}

#[async_trait]
impl WorkflowState for GeneMismatch {
    fn id(&self) -> StateId {
        StateId::new(ids::GENE_MISMATCH)
    }

    fn request_message(&self, memory: &SessionMemory) -> Option<String> {
        let (found, sequence) = Self::pending(memory)?;
        Some(prompts::fill(
            prompts::GENE_MISMATCH_REQUEST,
            &[
                ("requested", &Self::requested(memory)),
                ("found", &found),
                ("length", &sequence.len().to_string()),
            ],
        ))
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::GENE_MISMATCH),
            StateId::new(ids::GENE_LOOKUP),
            StateId::new(ids::GENE_CHOICE),
            StateId::new(ids::CONSTRUCT_CONFIRM),
        ]
    }

    fn escalation(&self) -> Option<StateId> {
        Some(StateId::new(ids::GENE_CHOICE))
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let requested = Self::requested(ctx.memory);
        let found = Self::pending(ctx.memory)
            .map(|(name, _)| name)
            .unwrap_or_else(|| "the returned sequence".to_string());
        let prompt = prompts::fill(
            prompts::GENE_MISMATCH_CLASSIFY,
            &[
                ("requested", &requested),
                ("found", &found),
                ("message", utterance),
            ],
        );
        let reply = ctx.services.classifier.classify(&prompt).await?;

        match MismatchDecision::from_payload(&reply) {
            MismatchDecision::Proceed => {
                let Some((name, sequence)) = Self::pending(ctx.memory) else {
                    return Ok((
                        StepResult::error(
                            "I no longer have that sequence on hand. Let's pick the \
                             insert again.",
                        ),
                        Transition::to(ids::GENE_CHOICE),
                    ));
                };
                let payload = Payload::new()
                    .with(recorded::GENE_NAME, json!(name))
                    .with(recorded::GENE_SEQUENCE, json!(sequence));
                let response =
                    format!("**Insert recorded**\n\n{name} ({} bp)", sequence.len());
                Ok((
                    StepResult::success(response).with_payload(payload),
                    Transition::to(ids::CONSTRUCT_CONFIRM),
                ))
            }
            MismatchDecision::Retry => Ok((
                StepResult::success("Okay, let's try a different name."),
                Transition::to(ids::GENE_LOOKUP),
            )),
            MismatchDecision::Unclear => Ok((
                StepResult::error(format!(
                    "Should I use {found} anyway, or would you like to retry with a \
                     different name?"
                )),
                Transition::to(ids::GENE_MISMATCH),
            )),
        }
    }
}
