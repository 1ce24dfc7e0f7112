//! Credential hashing port.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Hashing error: {0}")]
pub struct HashingError(pub String);

/// One-way hashing of an author's password before it is stored.
pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, HashingError>;
}
