use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::memory::{SessionId, SessionMemory};
use crate::domain::registry::StateRegistry;
use crate::domain::services::Services;
use crate::domain::state::{StateId, StepContext, Transition};
use crate::error::EngineError;

/// Hard cap on states chained within one turn, against auto-advance cycles
const MAX_STEPS_PER_TURN: usize = 16;

/// Shown when a step blows up instead of returning a result
const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while handling that message. Let's try that again.";

/// Shown when the retry budget runs out and a recovery route exists
const ESCALATION_MESSAGE: &str =
    "That has not worked after several attempts, so let's take a different route.";

/// Shown when the retry budget runs out with nowhere left to go
const DEAD_END_MESSAGE: &str =
    "That has not worked after several attempts. Ending the session here.";

/// How many consecutive failed attempts a state gets before escalation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Consecutive error results allowed before the driver escalates
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Rendered output of one conversation turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    /// Text blocks emitted this turn, joined by blank lines
    pub text: String,

    /// Whether the session has ended
    pub finished: bool,
}

/// Runs one conversation: holds the current state, the pending-state queue,
/// and the session memory, and advances them one turn at a time
///
/// A turn feeds the utterance into the current state, records the result,
/// and follows the returned transition. Auto-advance states are chained
/// within the turn until a state awaits input or the session terminates.
/// Failures never crash the turn: a step that returns `Err` is logged and
/// surfaced as a generic failure message, and repeated error self-loops are
/// cut off by the retry policy.
pub struct SessionDriver {
    session_id: SessionId,
    registry: Arc<StateRegistry>,
    services: Services,
    memory: SessionMemory,
    current: Option<StateId>,
    pending: VecDeque<StateId>,
    failures: HashMap<StateId, u32>,
    retry: RetryPolicy,
}

impl SessionDriver {
    /// Create a driver for a validated registry, positioned at the entry state
    pub fn new(registry: Arc<StateRegistry>, services: Services) -> Result<Self, EngineError> {
        registry.validate()?;
        let entry = registry.entry_id().clone();
        Ok(Self {
            session_id: SessionId::new(),
            registry,
            services,
            memory: SessionMemory::new(),
            current: Some(entry),
            pending: VecDeque::new(),
            failures: HashMap::new(),
            retry: RetryPolicy::default(),
        })
    }

    /// Override the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Current session id; changes when the conversation restarts
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// State currently awaiting input, `None` once the session has ended
    pub fn current_state(&self) -> Option<&StateId> {
        self.current.as_ref()
    }

    /// What the conversation has recorded so far
    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    /// Whether the session has ended
    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Open the conversation: run the entry chain up to the first prompt
    pub async fn begin(&mut self) -> Result<TurnReply, EngineError> {
        info!(session = %self.session_id, "session started");
        self.advance(None).await
    }

    /// Feed one user utterance into the conversation
    pub async fn handle_message(&mut self, utterance: &str) -> Result<TurnReply, EngineError> {
        self.advance(Some(utterance)).await
    }

    async fn advance(&mut self, mut input: Option<&str>) -> Result<TurnReply, EngineError> {
        let mut blocks: Vec<String> = Vec::new();
        let mut steps_taken = 0usize;

        while let Some(current) = self.current.clone() {
            let state = self.registry.get(&current)?;

            let utterance = if state.requires_input() {
                match input.take() {
                    Some(utterance) => utterance,
                    None => {
                        if let Some(prompt) = state.request_message(&self.memory) {
                            blocks.push(prompt);
                        }
                        break;
                    }
                }
            } else {
                ""
            };

            steps_taken += 1;
            if steps_taken > MAX_STEPS_PER_TURN {
                return Err(EngineError::InvalidWorkflow(format!(
                    "auto-advance loop detected at state '{}'",
                    current
                )));
            }

            debug!(session = %self.session_id, state = %current, "stepping state");
            let ctx = StepContext {
                memory: &self.memory,
                services: &self.services,
            };
            let (result, transition) = match state.step(utterance, ctx).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    // Infrastructure failure: stay put, tell the user, and
                    // let the next utterance try again.
                    error!(session = %self.session_id, state = %current, error = %err, "state step failed");
                    blocks.push(GENERIC_FAILURE_MESSAGE.to_string());
                    if let Some(prompt) = state.request_message(&self.memory) {
                        blocks.push(prompt);
                    }
                    break;
                }
            };

            let failed = result.is_error();
            if !result.response.is_empty() {
                blocks.push(result.response.clone());
            }
            self.memory.record(current.clone(), result);

            let mut next = self.resolve(transition);

            if failed && next.as_ref() == Some(&current) {
                let attempts = self.failures.entry(current.clone()).or_insert(0);
                *attempts += 1;
                if *attempts >= self.retry.max_attempts {
                    warn!(
                        session = %self.session_id,
                        state = %current,
                        attempts = *attempts,
                        "retry budget exhausted, escalating"
                    );
                    self.failures.remove(&current);
                    next = state.escalation();
                    blocks.push(
                        if next.is_some() {
                            ESCALATION_MESSAGE
                        } else {
                            DEAD_END_MESSAGE
                        }
                        .to_string(),
                    );
                }
            } else {
                self.failures.remove(&current);
            }

            match next {
                Some(next_id) => self.enter(&current, next_id),
                None => self.current = None,
            }
        }

        let finished = self.current.is_none();
        if finished {
            info!(session = %self.session_id, "session finished");
        }
        Ok(TurnReply {
            text: blocks.join("\n\n"),
            finished,
        })
    }

    /// Turn a transition into the next state, consulting the pending queue
    fn resolve(&mut self, transition: Transition) -> Option<StateId> {
        match transition {
            Transition::Single(id) => Some(id),
            Transition::Sequence(ids) => {
                let mut ids = ids.into_iter();
                let first = ids.next();
                let rest: Vec<StateId> = ids.collect();
                for id in rest.into_iter().rev() {
                    self.pending.push_front(id);
                }
                first.or_else(|| self.pending.pop_front())
            }
            Transition::Terminal => self.pending.pop_front(),
        }
    }

    /// Move into the next state; arriving at the entry state from a
    /// different state restarts the conversation with fresh memory and a
    /// fresh session id
    fn enter(&mut self, from: &StateId, next: StateId) {
        if next == *self.registry.entry_id() && *from != next {
            info!(session = %self.session_id, "conversation restarted");
            self.memory = SessionMemory::new();
            self.pending.clear();
            self.failures.clear();
            self.session_id = SessionId::new();
        }
        self.current = Some(next);
    }
}

impl std::fmt::Debug for SessionDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDriver")
            .field("session_id", &self.session_id)
            .field("current", &self.current)
            .field("pending", &self.pending)
            .field("failures", &self.failures)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
