//! Testing utilities for Clonepilot.
//!
//! This crate provides standardized testing utilities for the workspace:
//! scripted collaborator fakes, mockall mocks for the collaborator traits,
//! and fixture builders for payloads and sequence records.

pub mod builders;
pub mod mocks;

/// Re-export commonly used types for convenience
pub use mockall;

pub use builders::{payload_of, record, synthetic_backbone, synthetic_gene};
pub use mocks::collaborators::{
    scripted_services, MockClassifier, MockSequenceLookup, MockSequenceRepository,
    ScriptedClassifier, ScriptedLookup, StaticLibrary,
};
