use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Author, AuthorSummary, Post, PostContent};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with [`RepoError::NotFound`] when
    /// nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Author repository.
///
/// The back-reference list is only ever mutated one element at a time, so
/// concurrent writers on the same author cannot lose each other's updates.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, Uuid> {
    /// Public fields of every author, ordered by name.
    async fn find_all_summaries(&self) -> Result<Vec<AuthorSummary>, RepoError>;

    /// Public fields of every author in `ids` that exists, in no particular order.
    async fn find_summaries(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>, RepoError>;

    /// Append `post_id` to the author's list. Appending an id that is
    /// already present is a no-op. Fails with [`RepoError::NotFound`] when
    /// the author does not exist.
    async fn add_post_ref(&self, author_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;

    /// Remove `post_id` from the author's list. Returns whether an entry was
    /// removed. Fails with [`RepoError::NotFound`] when the author does not
    /// exist.
    async fn remove_post_ref(&self, author_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Every post, in creation order.
    async fn find_all(&self) -> Result<Vec<Post>, RepoError>;

    /// The posts among `ids` that exist, in the order of `ids`.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError>;

    /// Posts that have never had `created_at` set.
    async fn find_missing_created_at(&self) -> Result<Vec<Post>, RepoError>;

    /// Replace the content fields of a post and set `updated_at`.
    /// Returns `None` when the post does not exist.
    async fn update_content(
        &self,
        id: Uuid,
        content: PostContent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError>;

    /// Set both timestamps, but only while `created_at` is still unset.
    /// Returns whether the post was written.
    async fn set_timestamps_if_absent(
        &self,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepoError>;
}
