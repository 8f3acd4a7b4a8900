/// State abstraction and transition contract
pub mod state;

/// Session memory
pub mod memory;

/// State registry and workflow validation
pub mod registry;

/// Collaborator ports (classifier, repository, lookup)
pub mod services;
