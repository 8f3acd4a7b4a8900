//! Entry state: prints the overview banner and hands over to the backbone
//! step. Re-entering it mid-session is what triggers a driver restart.

use async_trait::async_trait;

use clonepilot_core::{
    EngineError, SessionMemory, StateId, StepContext, StepResult, Transition, WorkflowState,
};

use crate::ids;
use crate::prompts;

/// Auto-advance opening state
pub struct Entry;

#[async_trait]
impl WorkflowState for Entry {
    fn id(&self) -> StateId {
        StateId::new(ids::ENTRY)
    }

    fn requires_input(&self) -> bool {
        false
    }

    fn request_message(&self, _memory: &SessionMemory) -> Option<String> {
        None
    }

    fn linked_states(&self) -> Vec<StateId> {
        vec![StateId::new(ids::BACKBONE_METHOD)]
    }

    async fn step(
        &self,
        _utterance: &str,
        _ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError> {
        Ok((
            StepResult::success(prompts::ENTRY_BANNER),
            Transition::to(ids::BACKBONE_METHOD),
        ))
    }
}
