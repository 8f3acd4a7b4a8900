use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::memory::SessionMemory;
use crate::domain::services::Services;
use crate::error::EngineError;
use crate::types::Payload;

/// Value object: state identifier, also the memory key for the state's result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId(pub String);

impl StateId {
    /// Create a state id from any string-ish value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Outcome status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// The step understood the utterance and made progress
    Success,
    /// The step could not act on the utterance; the transition must lead
    /// back to a state that can re-request the missing information
    Error,
}

/// Result of stepping a state with one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    /// Whether the step made progress
    pub status: StepStatus,

    /// Free-text reasoning the classifier reported, empty when none
    pub rationale: String,

    /// Structured fields extracted during the step
    pub payload: Payload,

    /// Rendered text block shown to the user, may be empty
    pub response: String,
}

impl StepResult {
    /// A successful step with the given user-facing response
    pub fn success(response: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Success,
            rationale: String::new(),
            payload: Payload::new(),
            response: response.into(),
        }
    }

    /// A failed step with the given corrective response
    pub fn error(response: impl Into<String>) -> Self {
        Self {
            status: StepStatus::Error,
            rationale: String::new(),
            payload: Payload::new(),
            response: response.into(),
        }
    }

    /// Attach the extracted payload
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Attach the classifier's reasoning
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    /// Check whether the step failed
    #[inline]
    pub fn is_error(&self) -> bool {
        self.status == StepStatus::Error
    }
}

/// Where the conversation goes after a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// Move to one named state
    Single(StateId),

    /// Move to the first listed state and queue the rest in order
    Sequence(Vec<StateId>),

    /// Finish, unless queued states remain from an earlier sequence
    Terminal,
}

impl Transition {
    /// Convenience constructor for a single-state transition
    pub fn to(id: impl Into<String>) -> Self {
        Transition::Single(StateId::new(id))
    }
}

/// Read-only context handed to a state for one step
pub struct StepContext<'a> {
    /// Everything earlier states have recorded this session
    pub memory: &'a SessionMemory,

    /// Handles to the external collaborators
    pub services: &'a Services,
}

/// One state of the design conversation
///
/// A state owns a single decision: it interprets the user's utterance
/// (usually through the classifier), reports what it understood, and names
/// the next state. It never mutates shared structures; everything it wants
/// remembered goes into the returned [`StepResult`] payload, which the
/// driver records under this state's id.
#[async_trait]
pub trait WorkflowState: Send + Sync {
    /// Identifier of this state, unique within a registry
    fn id(&self) -> StateId;

    /// Whether this state waits for a user utterance before stepping
    fn requires_input(&self) -> bool {
        true
    }

    /// The message shown when this state starts waiting for input
    ///
    /// Implementations may fill details from earlier results in `memory`.
    /// Auto-advance states return `None`.
    fn request_message(&self, memory: &SessionMemory) -> Option<String>;

    /// Static outgoing edges, used to validate the workflow graph
    fn linked_states(&self) -> Vec<StateId>;

    /// Where the driver routes after repeated failed attempts in this state
    fn escalation(&self) -> Option<StateId> {
        None
    }

    /// Interpret one utterance and decide the next state
    async fn step(
        &self,
        utterance: &str,
        ctx: StepContext<'_>,
    ) -> Result<(StepResult, Transition), EngineError>;
}

impl std::fmt::Debug for dyn WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WorkflowState({})", self.id())
    }
}
