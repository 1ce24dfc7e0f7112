//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    pub image: String,
    pub author: Uuid,
}

/// Request to replace a post's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub body: String,
    pub image: String,
}

/// Request to register an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAuthorRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Public fields of an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// A post, with its author when they could be resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub image: String,
    pub author_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// `created_at`, or the instant embedded in `id` when it was never stored.
    pub formatted_created_at: Option<DateTime<Utc>>,
}

/// An author together with their posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorPostsResponse {
    pub author: AuthorResponse,
    pub posts: Vec<PostResponse>,
}

/// Result of deleting a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePostResponse {
    pub id: Uuid,
}

/// Result of the timestamp backfill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillResponse {
    pub migrated_count: usize,
    pub skipped: usize,
}
