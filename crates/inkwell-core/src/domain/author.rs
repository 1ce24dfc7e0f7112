use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Author entity - the owner of a list of posts.
///
/// `posts` is a back-reference index kept in step with `Post::author_id`;
/// the posts themselves are the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub credential_hash: String,
    pub posts: Vec<Uuid>,
}

impl Author {
    /// Create a new author with a generated ID and no posts.
    pub fn new(name: String, email: String, credential_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            credential_hash,
            posts: Vec::new(),
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public fields of an author, joined onto posts when they are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Sign-up details for a new author. `password` is plaintext and only ever
/// reaches a password hasher.
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("password", &self.password),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidArgument(format!(
                    "{name} must not be empty"
                )));
            }
        }

        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(DomainError::InvalidArgument(
                "email must be an address".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_hash_is_never_serialized() {
        let author = Author::new("Ada".into(), "ada@example.com".into(), "$argon2id$x".into());
        let json = serde_json::to_value(&author).unwrap();
        assert!(json.get("credential_hash").is_none());
        assert_eq!(json["name"], "Ada");
    }

    #[test]
    fn registration_requires_every_field() {
        let err = Registration::new("Ada", "ada@example.com", "  ")
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: password must not be empty"
        );
    }

    #[test]
    fn registration_rejects_malformed_email() {
        for email in ["ada", "@example.com", "ada@"] {
            let err = Registration::new("Ada", email, "secret").validate();
            assert!(matches!(err, Err(DomainError::InvalidArgument(_))), "{email}");
        }
        assert!(Registration::new("Ada", "ada@example.com", "secret")
            .validate()
            .is_ok());
    }
}
