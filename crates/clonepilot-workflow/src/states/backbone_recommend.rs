//! Recommends a curated backbone from the user's description of their
//! experiment.
//!
//! The recommendation itself comes from the classifier; this state only
//! accepts picks that are actually in the curated list, then loads the
//! record from the local library exactly like a direct curated choice
//! would.

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
use crate::views::RecommendReply;

/// Experiment-driven backbone recommendation
pub struct BackboneRecommend;

#[async_trait]
impl WorkflowState for BackboneRecommend {
    fn id(&self) -> StateId {
        StateId::new(ids::BACKBONE_RECOMMEND)
    }

    fn request_message(&self, _memory: &SessionMemory) -> Option<String> {
        Some(prompts::fill(
            prompts::BACKBONE_RECOMMEND_REQUEST,
            &[("options", &support::curated_options_block())],
        ))
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::BACKBONE_RECOMMEND),
            StateId::new(ids::BACKBONE_METHOD),
            StateId::new(ids::GENE_CHOICE),
        ]
    }

    fn escalation(&self) -> Option<StateId> {
        Some(StateId::new(ids::BACKBONE_METHOD))
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(
            prompts::BACKBONE_RECOMMEND_CLASSIFY,
            &[
                ("options", &support::curated_options_block()),
                ("message", utterance),
            ],
        );
        let reply = ctx.services.classifier.classify(&prompt).await?;
        let view = RecommendReply::from_payload(&reply);

        let Some(canonical) = support::curated_canonical(&view.backbone_name) else {
            debug!(suggested = %view.backbone_name, "recommendation outside the curated list");
            return Ok((
                StepResult::error(
                    "I could not match that to one of the curated backbones. Could \
                     you say more about the experiment, or name one of the options \
                     directly?",
                ),
                Transition::to(ids::BACKBONE_RECOMMEND),
            ));
        };

        let record = match ctx.services.repository.find_by_name(canonical).await? {
            Some(record) => record,
            None => {
                return Ok((
                    StepResult::error(format!(
                        "{canonical} is not available in the local library right \
                         now. Let's provide the backbone another way."
                    )),
                    Transition::to(ids::BACKBONE_METHOD),
                ));
            }
        };
        if let Err(reason) = support::validate_backbone(&record.sequence) {
            return Ok((
                StepResult::error(format!(
                    "The library copy of {canonical} is not usable: {reason}. \
                     Let's provide the backbone another way."
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

        let mut summary = format!("Recommended backbone: **{}** ({} bp)", record.name, record.len());
        if !view.details.is_empty() {
            summary.push_str(&format!("\n\n{}", view.details));
        }
        let response = support::selection_block(&summary, &view.thoughts);

        Ok((
            StepResult::success(response)
                .with_payload(payload)
                .with_rationale(view.thoughts),
            Transition::to(ids::GENE_CHOICE),
        ))
    }
}
