//! Fetches a backbone by name through the external lookup agent.
//!
//! The agent answering "nothing found" and the agent being unreachable are
//! different outcomes: a definitive miss sends the user back to the method
//! menu, an outage (after the retry budget) degrades to manual sequence
//! entry so the session can still finish.

use async_trait::async_trait;
use serde_json::json;

use clonepilot_core::{
    EngineError, LookupQuery, Payload, SessionMemory, StateId, StepContext, StepResult,
    Transition, WorkflowState,
};

use crate::fields::{recorded, reply};
use crate::ids;
use crate::prompts;
use crate::states::support;
use crate::WorkflowOptions;

/// Backbone-by-name lookup
pub struct BackboneLookup {
    options: WorkflowOptions,
}

impl BackboneLookup {
    pub fn new(options: WorkflowOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl WorkflowState for BackboneLookup {
    fn id(&self) -> StateId {
        StateId::new(ids::BACKBONE_LOOKUP)
    }

    fn request_message(&self, memory: &SessionMemory) -> Option<String> {
        let hint = memory
            .field(&StateId::new(ids::BACKBONE_METHOD), recorded::BACKBONE_NAME)
            .map(|name| format!(" You mentioned {name}."))
            .unwrap_or_default();
        Some(prompts::fill(
            prompts::BACKBONE_LOOKUP_REQUEST,
            &[("hint", &hint)],
        ))
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::BACKBONE_LOOKUP),
            StateId::new(ids::BACKBONE_METHOD),
            StateId::new(ids::BACKBONE_SEQUENCE),
            StateId::new(ids::GENE_CHOICE),
        ]
    }

    fn escalation(&self) -> Option<StateId> {
        Some(StateId::new(ids::BACKBONE_SEQUENCE))
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(prompts::BACKBONE_NAME_CLASSIFY, &[("message", utterance)]);
        let reply = ctx.services.classifier.classify(&prompt).await?;

        let mut name = reply.text_or_empty(reply::BACKBONE_NAME);
        if name.is_empty() {
            // Fall back to the name mentioned at the method menu
            name = ctx
                .memory
                .field(&StateId::new(ids::BACKBONE_METHOD), recorded::BACKBONE_NAME)
                .unwrap_or_default();
        }
        if name.is_empty() {
            return Ok((
                StepResult::error("I need the plasmid's name to look it up."),
                Transition::to(ids::BACKBONE_LOOKUP),
            ));
        }

        let query = LookupQuery::backbone(&name);
        let outcome = support::lookup_with_retries(
            ctx.services.lookup.as_ref(),
            &query,
            self.options.lookup_attempts,
            self.options.lookup_retry_delay,
        )
        .await;

        match outcome {
            Ok(Some(record)) => {
                if let Err(reason) = support::validate_backbone(&record.sequence) {
                    return Ok((
                        StepResult::error(format!(
                            "The sequence I found for {} is not usable as a backbone: \
                             {reason}. Let's provide the backbone another way.",
                            record.name
                        )),
                        Transition::to(ids::BACKBONE_METHOD),
                    ));
                }
                let payload = Payload::new()
                    .with(recorded::BACKBONE_NAME, json!(record.name))
                    .with(recorded::BACKBONE_SEQUENCE, json!(record.sequence));
                let response = format!(
                    "**Backbone found**\n\n{} ({} bp)",
                    record.name,
                    record.len()
                );
                Ok((
                    StepResult::success(response).with_payload(payload),
                    Transition::to(ids::GENE_CHOICE),
                ))
            }
            Ok(None) => Ok((
                StepResult::error(format!(
                    "I could not find a plasmid called '{name}'. Let's pick another \
                     way to provide the backbone."
                )),
                Transition::to(ids::BACKBONE_METHOD),
            )),
            Err(_) => Ok((
                StepResult::error(
                    "The sequence lookup service is unavailable right now. Paste \
                     the backbone sequence instead and we can keep going.",
                ),
                Transition::to(ids::BACKBONE_SEQUENCE),
            )),
        }
    }
}
