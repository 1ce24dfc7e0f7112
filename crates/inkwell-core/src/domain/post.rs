use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorSummary;
use crate::error::DomainError;

/// Post entity - a blog post written by exactly one author.
///
/// The id is time-ordered and embeds its creation instant. Posts written
/// before timestamps were tracked have `created_at`/`updated_at` unset until
/// the backfill runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub image_ref: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Build a fresh post stamped with `created_at`.
    pub fn new(id: Uuid, author_id: Uuid, content: PostContent, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author_id,
            title: content.title,
            body: content.body,
            image_ref: content.image_ref,
            created_at: Some(created_at),
            updated_at: Some(created_at),
        }
    }
}

/// The content fields of a post - everything an edit may replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub title: String,
    pub body: String,
    pub image_ref: String,
}

impl PostContent {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image_ref: image_ref.into(),
        }
    }

    /// Every field is required; whitespace-only counts as empty.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("title", &self.title),
            ("body", &self.body),
            ("image_ref", &self.image_ref),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidArgument(format!(
                    "{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// A post joined with the public fields of its author.
///
/// `author` is `None` when the author record no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Option<AuthorSummary>,
}

/// An author's listing: the posts that resolved, in list order, and the ids
/// on the author's list that no longer point at one of their posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPosts {
    pub author: AuthorSummary,
    pub posts: Vec<Post>,
    pub dangling: Vec<Uuid>,
}
