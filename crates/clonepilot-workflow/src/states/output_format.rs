//! Assembles the construct and renders it in the chosen format.
//!
//! This is where the conversation's accumulated choices become a
//! sequence: the established backbone and insert are resolved out of
//! memory, spliced, and printed. A generically-named insert is run
//! through gene identification first so the rendered record carries a
//! real name where possible.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use clonepilot_assembly::{AssemblyError, Construct, SequenceRecord};
use clonepilot_core::{
    EngineError, Payload, SessionMemory, StateId, StepContext, StepResult, Transition,
    WorkflowState,
};

use crate::fields::recorded;
use crate::identify::{identify_gene, needs_identification, UNIDENTIFIED_GENE};
use crate::ids;
use crate::prompts;
use crate::resolve::{resolve_backbone, resolve_gene};
use crate::views::FormatReply;

/// Format choice plus final assembly
pub struct OutputFormatSelection;

#[async_trait]
impl WorkflowState for OutputFormatSelection {
    fn id(&self) -> StateId {
        StateId::new(ids::OUTPUT_FORMAT)
    }

    fn request_message(&self, _memory: &SessionMemory) -> Option<String> {
        Some(prompts::OUTPUT_FORMAT_REQUEST.to_string())
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![
            StateId::new(ids::OUTPUT_FORMAT),
            StateId::new(ids::FINAL_SUMMARY),
            StateId::new(ids::GENE_CHOICE),
            StateId::new(ids::BACKBONE_METHOD),
        ]
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(prompts::OUTPUT_FORMAT_CLASSIFY, &[("message", utterance)]);
        let reply = ctx.services.classifier.classify(&prompt).await?;
        let view = FormatReply::from_payload(&reply);

        let Some(format) = view.format else {
            return Ok((
                StepResult::error(
                    "I did not catch the format. GenBank, FASTA, or the raw \
                     sequence?",
                ),
                Transition::to(ids::OUTPUT_FORMAT),
            ));
        };

        let Some(backbone) = resolve_backbone(ctx.memory) else {
            return Ok((
                StepResult::error(
                    "I do not have a backbone sequence on record anymore. Let's \
                     pick the backbone again.",
                ),
                Transition::to(ids::BACKBONE_METHOD),
            ));
        };
        let Some(gene) = resolve_gene(ctx.memory) else {
            return Ok((
                StepResult::error(
                    "I do not have an insert sequence on record anymore. Let's \
                     pick the insert again.",
                ),
                Transition::to(ids::GENE_CHOICE),
            ));
        };

        let mut gene_name = gene.name.clone();
        let mut organism = String::new();
        if needs_identification(&gene_name, &gene.sequence) {
            debug!(gene = %gene_name, "insert has no usable name, identifying");
            match identify_gene(ctx.services.classifier.as_ref(), &gene.sequence).await {
                Some(identification) => {
                    gene_name = identification.name;
                    organism = identification.organism;
                }
                None => gene_name = UNIDENTIFIED_GENE.to_string(),
            }
        }

        let backbone_record = SequenceRecord::new(&backbone.name, &backbone.sequence);
        let gene_record = SequenceRecord::new(&gene_name, &gene.sequence);
        let construct = match Construct::assemble(&backbone_record, &gene_record, None) {
            Ok(construct) => construct,
            Err(AssemblyError::EmptyGene) => {
                return Ok((
                    StepResult::error("The insert sequence is empty. Let's pick it again."),
                    Transition::to(ids::GENE_CHOICE),
                ));
            }
            Err(AssemblyError::EmptyBackbone) => {
                return Ok((
                    StepResult::error(
                        "The backbone sequence is empty. Let's pick it again.",
                    ),
                    Transition::to(ids::BACKBONE_METHOD),
                ));
            }
        };
        info!(
            backbone = %construct.backbone_name,
            gene = %construct.gene_name,
            method = %construct.method,
            position = construct.insertion_position,
            size = construct.len(),
            "construct assembled"
        );

        let rendered = format.render(&construct);
        let mut summary = vec![format!("- Gene: {}", construct.gene_name)];
        if !organism.is_empty() {
            summary.push(format!("- Organism: {organism}"));
        }
        summary.push(format!("- Backbone: {}", construct.backbone_name));
        summary.push(format!("- Total size: {} bp", construct.len()));
        summary.push(format!(
            "- Insertion: {} at position {}",
            construct.method, construct.insertion_position
        ));
        summary.push(format!("- Format: {}", format.as_str()));
        let response = format!(
            "{rendered}\n\n**Design summary**\n\n{}",
            summary.join("\n")
        );

        let payload = Payload::new()
            .with(recorded::SELECTED_FORMAT, json!(format.as_str()))
            .with(recorded::METHOD, json!(construct.method.as_str()))
            .with(
                recorded::INSERTION_POSITION,
                json!(construct.insertion_position.to_string()),
            )
            .with(recorded::CONSTRUCT_SEQUENCE, json!(construct.final_sequence))
            .with(recorded::RENDERED_CONSTRUCT, json!(response));

        Ok((
            StepResult::success(response).with_payload(payload),
            Transition::to(ids::FINAL_SUMMARY),
        ))
    }
}
