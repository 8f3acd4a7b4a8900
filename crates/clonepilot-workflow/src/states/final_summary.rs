//! Closes the session: download the design once more, loop back to
//! modify it, or start over.
//!
//! This state never error-loops. Anything it cannot parse is taken as
//! "we're done" and the session ends.

use async_trait::async_trait;

use clonepilot_core::{
    EngineError, SessionMemory, StateId, StepContext, StepResult, Transition, WorkflowState,
};

use crate::fields::recorded;
use crate::ids;
use crate::prompts;
use crate::views::NextAction;

const CLOSING: &str = "**Session complete**\n\nGood luck with the cloning!";

/// Post-design wrap-up
pub struct FinalSummary;

#[async_trait]
impl WorkflowState for FinalSummary {
    fn id(&self) -> StateId {
        StateId::new(ids::FINAL_SUMMARY)
    }

    fn request_message(&self, _memory: &SessionMemory) -> Option<String> {
        Some(prompts::FINAL_SUMMARY_REQUEST.to_string())
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![StateId::new(ids::GENE_CHOICE), StateId::new(ids::ENTRY)]
    }

    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        let prompt = prompts::fill(prompts::FINAL_SUMMARY_CLASSIFY, &[("message", utterance)]);
        let reply = ctx.services.classifier.classify(&prompt).await?;

        match NextAction::from_payload(&reply) {
            NextAction::Download => {
                let response = match ctx
                    .memory
                    .field(&StateId::new(ids::OUTPUT_FORMAT), recorded::RENDERED_CONSTRUCT)
                {
                    Some(rendered) => format!("{rendered}\n\n{CLOSING}"),
                    None => CLOSING.to_string(),
                };
                Ok((StepResult::success(response), Transition::Terminal))
            }
            NextAction::ModifyDesign => Ok((
                StepResult::success("Okay, let's adjust the design."),
                Transition::to(ids::GENE_CHOICE),
            )),
            NextAction::StartNewProject => Ok((
                StepResult::success("Starting a new project."),
                Transition::to(ids::ENTRY),
            )),
            NextAction::Other => Ok((
                StepResult::success(CLOSING),
                Transition::Terminal,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clonepilot_test_utils::{
        payload_of, scripted_services, ScriptedClassifier, ScriptedLookup, StaticLibrary,
    };
    use serde_json::json;
    use std::sync::Arc;

    async fn run(action: &str, memory: &SessionMemory) -> (StepResult, Transition) {
        let classifier = ScriptedClassifier::with_replies(vec![payload_of(&[(
            "Next Action",
            json!(action),
        )])]);
        let services = scripted_services(
            Arc::new(classifier),
            StaticLibrary::new(),
            Arc::new(ScriptedLookup::new()),
        );
        FinalSummary
            .step("answer", StepContext { memory, services: &services })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_download_reprises_the_rendered_design() {
        let mut memory = SessionMemory::new();
        memory.record(
            StateId::new(ids::OUTPUT_FORMAT),
            StepResult::success("").with_payload(payload_of(&[(
                recorded::RENDERED_CONSTRUCT,
                json!(">Construct (mcs): eGFP in pSynth\nACGT"),
            )])),
        );

        let (result, transition) = run("DOWNLOAD_DESIGN", &memory).await;

        assert!(!result.is_error());
        assert_eq!(transition, Transition::Terminal);
        assert!(result.response.contains(">Construct (mcs): eGFP in pSynth"));
        assert!(result.response.contains("Session complete"));
    }

    #[tokio::test]
    async fn test_download_without_a_design_still_closes() {
        let (result, transition) = run("DOWNLOAD_DESIGN", &SessionMemory::new()).await;

        assert_eq!(transition, Transition::Terminal);
        assert!(result.response.contains("Session complete"));
    }

    #[tokio::test]
    async fn test_modify_returns_to_insert_choice() {
        let (result, transition) = run("MODIFY_DESIGN", &SessionMemory::new()).await;

        assert!(!result.is_error());
        assert_eq!(transition, Transition::to(ids::GENE_CHOICE));
    }

    #[tokio::test]
    async fn test_new_project_returns_to_entry() {
        let (_, transition) = run("START_NEW_PROJECT", &SessionMemory::new()).await;

        assert_eq!(transition, Transition::to(ids::ENTRY));
    }

    #[tokio::test]
    async fn test_anything_else_finishes() {
        let (result, transition) = run("thanks, that is all", &SessionMemory::new()).await;

        assert!(!result.is_error());
        assert_eq!(transition, Transition::Terminal);
        assert!(result.response.contains("Session complete"));
    }
}
