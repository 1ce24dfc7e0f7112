//! Domain-level error types.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Aggregate kinds that can be named in a [`DomainError::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Author,
    Post,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Author => f.write_str("author"),
            Entity::Post => f.write_str("post"),
        }
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: Entity, id: Uuid },

    /// A unique field, such as an author email, is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn author_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: Entity::Author,
            id,
        }
    }

    pub fn post_not_found(id: Uuid) -> Self {
        Self::NotFound {
            entity: Entity::Post,
            id,
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
