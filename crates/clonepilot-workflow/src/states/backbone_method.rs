//! First interactive state: how will the backbone be provided?
//!
//! A curated pick is resolved against the local repository right here, so
//! the happy path costs a single turn. The other three choices only route;
//! the target state does the real work.

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use clonepilot_core::{
    EngineError, Payload, SessionMemory, StateId, StepContext, StepResult, Transition,
    WorkflowState,
};

use crate::fields::recorded;
use crate::ids;
use crate::prompts;
use crate::states::support;
use crate::views::{BackboneChoice, MethodReply};

/// Backbone acquisition-method selection
pub struct BackboneMethod;

#[async_trait]
impl WorkflowState for BackboneMethod {
    fn id(&self) -> StateId {
        StateId::new(ids::BACKBONE_METHOD)
    }

    fn request_message(&self, _memory: &SessionMemory) -> Option<String> {
        Some(prompts::fill(
            prompts::BACKBONE_METHOD_REQUEST,
            &[("options", &support::curated_options_block())],
        ))
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::BACKBONE_METHOD),
            StateId::new(ids::BACKBONE_SEQUENCE),
            StateId::new(ids::BACKBONE_LOOKUP),
            StateId::new(ids::BACKBONE_RECOMMEND),
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
        let prompt = prompts::fill(
            prompts::BACKBONE_METHOD_CLASSIFY,
            &[
                ("options", support::curated_options_block().as_str()),
                ("message", utterance),
            ],
        );
        let reply = ctx.services.classifier.classify(&prompt).await?;
        let view = MethodReply::from_payload(&reply);
        debug!(choice = ?view.choice, "backbone method classified");

        match view.choice {
            BackboneChoice::Curated => resolve_curated(&view, &ctx).await,
            BackboneChoice::CustomSequence => Ok((
                StepResult::success(support::selection_block(
                    "You will paste your own backbone sequence.",
                    &view.thoughts,
                ))
                .with_rationale(view.thoughts),
                Transition::to(ids::BACKBONE_SEQUENCE),
            )),
            BackboneChoice::LookupByName => {
                // Keep the name for the lookup state's prompt, if one was
                // already given
                let payload =
                    Payload::new().with(recorded::BACKBONE_NAME, json!(view.backbone_name.trim()));
                Ok((
                    StepResult::success(support::selection_block(
                        "I will look the backbone up by name.",
                        &view.thoughts,
                    ))
                    .with_payload(payload)
                    .with_rationale(view.thoughts),
                    Transition::to(ids::BACKBONE_LOOKUP),
                ))
            }
            BackboneChoice::Recommend => Ok((
                StepResult::success(support::selection_block(
                    "I will recommend a backbone from your requirements.",
                    &view.thoughts,
                ))
                .with_rationale(view.thoughts),
                Transition::to(ids::BACKBONE_RECOMMEND),
            )),
            BackboneChoice::Unclear => Ok((
                StepResult::error(
                    "I could not tell how you would like to provide the backbone. \
                     Pick a curated option by name or number, say you will paste a \
                     sequence, give me a name to look up, or describe your \
                     requirements.",
                ),
                Transition::to(ids::BACKBONE_METHOD),
            )),
        }
    }
}

/// Resolve a curated pick against the repository
async fn resolve_curated(
    view: &MethodReply,
    ctx: &StepContext<'_>,
) -> Result<(StepResult, Transition), EngineError> {
    let Some(canonical) = support::curated_canonical(&view.backbone_name) else {
        return Ok((
            StepResult::error(
                "Which curated option did you mean? Name it exactly or give its number.",
            ),
            Transition::to(ids::BACKBONE_METHOD),
        ));
    };

    let Some(record) = ctx.services.repository.find_by_name(canonical).await? else {
        return Ok((
            StepResult::error(format!(
                "{canonical} is not available in the local library right now. \
                 Pick the other option, or provide the backbone another way."
            )),
            Transition::to(ids::BACKBONE_METHOD),
        ));
    };

    if let Err(reason) = support::validate_backbone(&record.sequence) {
        return Ok((
            StepResult::error(format!(
                "The library copy of {} is not usable: {reason}. \
                 Pick the other option, or provide the backbone another way.",
                record.name
            )),
            Transition::to(ids::BACKBONE_METHOD),
        ));
    }

    let mut payload = Payload::new()
        .with(recorded::BACKBONE_NAME, json!(record.name))
        .with(recorded::BACKBONE_SEQUENCE, json!(record.sequence));
    if let Some(promoter) = &record.promoter {
        payload.set(recorded::PROMOTER, json!(promoter));
    }
    if let Some(marker) = &record.selection_marker {
        payload.set(recorded::SELECTION_MARKER, json!(marker));
    }
    if let Some(origin) = &record.origin {
        payload.set(recorded::ORIGIN, json!(origin));
    }

    let summary = format!("Backbone: **{}** ({} bp)", record.name, record.len());
    Ok((
        StepResult::success(support::selection_block(&summary, &view.thoughts))
            .with_payload(payload)
            .with_rationale(view.thoughts.clone()),
        Transition::to(ids::GENE_CHOICE),
    ))
}
