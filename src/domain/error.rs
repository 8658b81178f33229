//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid tree construction input.
///
/// Identifiers are carried in their `Debug` rendering so the error stays
/// independent of the tree's identifier type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("missing root: adjacency structure is empty")]
    EmptyAdjacency,

    #[error("missing root: {0} is not a key of the adjacency structure")]
    RootNotFound(String),

    #[error("duplicate node key: {0}")]
    DuplicateKey(String),
}

impl DomainError {
    /// True for both flavours of the "missing root" construction error.
    pub fn is_missing_root(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyAdjacency | DomainError::RootNotFound(_)
        )
    }
}

/// Result type for tree construction.
pub type TreeResult<T> = Result<T, DomainError>;
