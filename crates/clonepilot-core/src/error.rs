use thiserror::Error;

/// Core error type for the conversation engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A transition or escalation named a state the registry does not know
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// The workflow graph failed validation
    #[error("Invalid workflow: {0}")]
    InvalidWorkflow(String),

    /// A collaborator reply could not be read as a field map
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A collaborator call failed
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Error type for the external collaborators (classifier, repository, lookup)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The collaborator could not be reached or kept failing
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered, but the reply could not be decoded
    #[error("Malformed collaborator reply: {0}")]
    MalformedReply(String),

    /// Transport-level failure (HTTP status, connection reset, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Input/output error
    #[error("Input/output error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for CollaboratorError {
    fn from(err: serde_json::Error) -> Self {
        CollaboratorError::MalformedReply(err.to_string())
    }
}

impl From<std::io::Error> for CollaboratorError {
    fn from(err: std::io::Error) -> Self {
        CollaboratorError::Io(err.to_string())
    }
}

impl From<String> for EngineError {
    fn from(err: String) -> Self {
        EngineError::Other(err)
    }
}

impl From<&str> for EngineError {
    fn from(err: &str) -> Self {
        EngineError::Other(err.to_string())
    }
}
