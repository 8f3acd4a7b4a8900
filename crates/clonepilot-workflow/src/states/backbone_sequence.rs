//! Records a user-pasted backbone.
//!
//! The sequence is pulled out of the message locally (longest A/C/G/T run);
//! the classifier contributes the name and any annotations the user
//! mentioned alongside. This state is also the escalation target for the
//! method menu, so it must cope with arriving unannounced.

use async_trait::async_trait;
use serde_json::json;

use clonepilot_assembly::{is_valid_dna, longest_dna_run, sanitize_sequence};
use clonepilot_core::{
    EngineError, Payload, SessionMemory, StateId, StepContext, StepResult, Transition,
    WorkflowState,
};

use crate::fields::recorded;
use crate::ids;
use crate::prompts;
use crate::states::support;
use crate::views::CustomBackboneReply;

/// Custom backbone intake
pub struct BackboneSequence;

#[async_trait]
impl WorkflowState for BackboneSequence {
    fn id(&self) -> StateId {
        StateId::new(ids::BACKBONE_SEQUENCE)
    }

    fn request_message(&self, _memory: &SessionMemory) -> Option<String> {
        Some(prompts::BACKBONE_SEQUENCE_REQUEST.to_string())
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::BACKBONE_SEQUENCE),
            StateId::new(ids::GENE_CHOICE),
        ]
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(prompts::BACKBONE_SEQUENCE_CLASSIFY, &[("message", utterance)]);
        let reply = ctx.services.classifier.classify(&prompt).await?;
        let view = CustomBackboneReply::from_payload(&reply);

        // The local extraction is authoritative; the classifier's copy only
        // wins when it is valid DNA and strictly longer.
        let local = longest_dna_run(utterance).unwrap_or_default();
        let from_classifier = sanitize_sequence(&view.sequence_extracted);
        let candidate = if from_classifier.len() > local.len() && is_valid_dna(&from_classifier) {
            from_classifier
        } else {
            local
        };

        if candidate.is_empty() {
            return Ok((
                StepResult::error(
                    "I could not find a DNA sequence in that message. Paste the \
                     backbone as plain A/C/G/T text.",
                ),
                Transition::to(ids::BACKBONE_SEQUENCE),
            ));
        }
        if let Err(reason) = support::validate_backbone(&candidate) {
            return Ok((
                StepResult::error(format!(
                    "That does not work as a backbone: {reason}. Paste the full \
                     sequence as plain A/C/G/T text."
                )),
                Transition::to(ids::BACKBONE_SEQUENCE),
            ));
        }

        let name = if view.backbone_name.trim().is_empty() {
            crate::resolve::FALLBACK_BACKBONE_NAME.to_string()
        } else {
            view.backbone_name.trim().to_string()
        };

        let mut payload = Payload::new()
            .with(recorded::BACKBONE_NAME, json!(name))
            .with(recorded::BACKBONE_SEQUENCE, json!(candidate));
        if !view.promoter.trim().is_empty() {
            payload.set(recorded::PROMOTER, json!(view.promoter.trim()));
        }
        if !view.selection_marker.trim().is_empty() {
            payload.set(recorded::SELECTION_MARKER, json!(view.selection_marker.trim()));
        }
        if !view.origin.trim().is_empty() {
            payload.set(recorded::ORIGIN, json!(view.origin.trim()));
        }

        let response = format!("**Backbone recorded**\n\n{} ({} bp)", name, candidate.len());
        Ok((
            StepResult::success(response).with_payload(payload),
            Transition::to(ids::GENE_CHOICE),
        ))
    }
}
