use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::state::{StateId, StepResult};

/// Value object: session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Mint a fresh random session id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recorded step result, with the moment it was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// The result the state produced
    pub result: StepResult,

    /// Recording timestamp
    pub recorded_at: DateTime<Utc>,
}

/// What the conversation has established so far, keyed by state id
///
/// Each state owns exactly one slot: recording under the same id replaces
/// the previous entry, other states' entries are never touched. The whole
/// map lives only as long as the session and is discarded on restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMemory {
    entries: HashMap<StateId, MemoryEntry>,
}

impl SessionMemory {
    /// Create an empty memory
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Record a state's result, replacing that state's previous entry
    pub fn record(&mut self, writer: StateId, result: StepResult) {
        self.entries.insert(
            writer,
            MemoryEntry {
                result,
                recorded_at: Utc::now(),
            },
        );
    }

    /// Fetch a state's latest entry
    pub fn entry(&self, state: &StateId) -> Option<&MemoryEntry> {
        self.entries.get(state)
    }

    /// Fetch a state's latest result
    pub fn result(&self, state: &StateId) -> Option<&StepResult> {
        self.entries.get(state).map(|entry| &entry.result)
    }

    /// Read one payload field out of a state's latest result
    pub fn field(&self, state: &StateId, field: &str) -> Option<String> {
        self.result(state).and_then(|result| {
            let value = result.payload.text_or_empty(field);
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        })
    }

    /// Number of states that have recorded a result
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
