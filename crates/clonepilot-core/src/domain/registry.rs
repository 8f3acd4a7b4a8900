use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::state::{StateId, WorkflowState};
use crate::error::EngineError;

/// Canonical collection of the states making up one workflow
///
/// Every state is registered exactly once under its id; the driver resolves
/// transitions through this table. [`StateRegistry::validate`] walks the
/// static edges from the entry state so dangling references surface when
/// the workflow is assembled, not mid-conversation.
#[derive(Clone)]
pub struct StateRegistry {
    entry: StateId,
    states: HashMap<StateId, Arc<dyn WorkflowState>>,
}

impl StateRegistry {
    /// Create a registry whose conversation starts at `entry`
    pub fn new(entry: StateId) -> Self {
        Self {
            entry,
            states: HashMap::new(),
        }
    }

    /// Id of the entry state
    pub fn entry_id(&self) -> &StateId {
        &self.entry
    }

    /// Register a state under its own id
    ///
    /// Registering two states with the same id is a wiring bug and is
    /// rejected rather than silently replaced.
    pub fn register(&mut self, state: Arc<dyn WorkflowState>) -> Result<(), EngineError> {
        let id = state.id();
        if self.states.contains_key(&id) {
            return Err(EngineError::InvalidWorkflow(format!(
                "state '{}' registered twice",
                id
            )));
        }
        self.states.insert(id, state);
        Ok(())
    }

    /// Resolve a state by id
    pub fn get(&self, id: &StateId) -> Result<Arc<dyn WorkflowState>, EngineError> {
        self.states
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownState(id.to_string()))
    }

    /// Number of registered states
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the registry holds no states
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Check the workflow graph for wiring mistakes
    ///
    /// Walks `linked_states` and `escalation` edges from the entry and
    /// rejects: an unregistered entry, edges to unregistered states, and
    /// auto-advance states with no outgoing edge (they could never leave).
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.states.contains_key(&self.entry) {
            return Err(EngineError::InvalidWorkflow(format!(
                "entry state '{}' is not registered",
                self.entry
            )));
        }

        let mut visited: HashSet<StateId> = HashSet::new();
        let mut queue: VecDeque<StateId> = VecDeque::new();
        queue.push_back(self.entry.clone());

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let state = self.get(&id)?;

            let mut edges = state.linked_states();
            if let Some(escalation) = state.escalation() {
                edges.push(escalation);
            }

            if !state.requires_input() && edges.is_empty() {
                return Err(EngineError::InvalidWorkflow(format!(
                    "auto-advance state '{}' has no outgoing edge",
                    id
                )));
            }

            for edge in edges {
                if !self.states.contains_key(&edge) {
                    return Err(EngineError::InvalidWorkflow(format!(
                        "state '{}' links to unregistered state '{}'",
                        id, edge
                    )));
                }
                if !visited.contains(&edge) {
                    queue.push_back(edge);
                }
            }
        }

        tracing::debug!(states = self.states.len(), "workflow graph validated");
        Ok(())
    }
}
