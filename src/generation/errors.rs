//! Error types for the generation domain

use thiserror::Error;

/// Conditions that abort a generation run; no artifacts are produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("No operations remain after filtering")]
    EmptySelection,

    #[error("Schema '{identifier}' referenced by '{referenced_by}' is not defined in the document")]
    UnresolvedSchemaReference {
        identifier: String,
        referenced_by: String,
    },

    #[error(
        "Unable to resolve a unique name '{name}' in interface '{interface}' for operations {operations:?}"
    )]
    NamingCollisionUnresolvable {
        interface: String,
        name: String,
        operations: Vec<String>,
    },

    #[error("Inconsistent configuration: {0}")]
    InconsistentConfiguration(String),
}

impl GenerationError {
    pub fn unresolved<I: Into<String>, R: Into<String>>(identifier: I, referenced_by: R) -> Self {
        Self::UnresolvedSchemaReference {
            identifier: identifier.into(),
            referenced_by: referenced_by.into(),
        }
    }

    pub fn inconsistent<S: Into<String>>(message: S) -> Self {
        Self::InconsistentConfiguration(message.into())
    }
}
