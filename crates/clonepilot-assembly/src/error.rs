use thiserror::Error;

/// Error type for sequence assembly
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// The backbone sequence is empty
    #[error("Backbone sequence is empty")]
    EmptyBackbone,

    /// The gene sequence is empty
    #[error("Gene sequence is empty")]
    EmptyGene,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AssemblyError::EmptyBackbone.to_string(),
            "Backbone sequence is empty"
        );
        assert_eq!(AssemblyError::EmptyGene.to_string(), "Gene sequence is empty");
    }
}
