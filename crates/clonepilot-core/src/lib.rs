//!
//! Clonepilot Core - conversation engine for the construct-design workflow
//!
//! This crate defines the state abstraction, session memory, and driver loop
//! that carry a user through a multi-turn design conversation. Concrete
//! states live in `clonepilot-workflow`; this crate only knows how to run
//! them: feed each user utterance into the current state, record the result,
//! and follow the transition the state hands back.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - states, transitions, memory, and collaborator ports
pub mod domain;

/// Application services - the session driver
pub mod application;

/// Core types shared across states
pub mod types;

/// Error types
pub mod error;

// Re-export key types
pub use error::{CollaboratorError, EngineError};
pub use types::Payload;

// Re-export main API types for easy use
pub use application::session_driver::{RetryPolicy, SessionDriver, TurnReply};
pub use domain::memory::{MemoryEntry, SessionId, SessionMemory};
pub use domain::registry::StateRegistry;
pub use domain::services::{
    Classifier, LookupKind, LookupQuery, SequenceLookup, SequenceRepository, Services,
};
pub use domain::state::{
    StateId, StepContext, StepResult, StepStatus, Transition, WorkflowState,
};
