//! Mock and fake implementations of the collaborator traits.

pub mod collaborators;
