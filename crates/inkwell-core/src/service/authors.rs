//! Author registration and directory listing.

use std::sync::Arc;

use crate::domain::{Author, AuthorSummary, Registration};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthorRepository, PasswordService};

#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn AuthorRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AuthorService {
    pub fn new(authors: Arc<dyn AuthorRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { authors, passwords }
    }

    /// Store a new author with a hashed credential and an empty post list.
    /// An email that is already registered is a [`DomainError::Conflict`].
    pub async fn register(&self, registration: Registration) -> Result<AuthorSummary, DomainError> {
        registration.validate()?;

        let credential_hash = self
            .passwords
            .hash(&registration.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let email = registration.email.trim().to_string();
        let author = Author::new(
            registration.name.trim().to_string(),
            email.clone(),
            credential_hash,
        );

        let author = match self.authors.save(author).await {
            Ok(author) => author,
            Err(RepoError::Constraint(_)) => {
                return Err(DomainError::Conflict(format!(
                    "an author with email {email} already exists"
                )));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(author_id = %author.id, "Author registered");
        Ok(author.summary())
    }

    pub async fn list_authors(&self) -> Result<Vec<AuthorSummary>, DomainError> {
        Ok(self.authors.find_all_summaries().await?)
    }
}
