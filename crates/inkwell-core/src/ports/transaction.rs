//! Transaction port - the multi-record atomic unit used to create a post.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Post;
use crate::error::RepoError;

/// Opens atomic units spanning the post and author tables.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, RepoError>;
}

/// Writes staged inside one atomic unit.
///
/// Nothing is visible to other readers until [`commit`](Self::commit)
/// succeeds. Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn insert_post(&mut self, post: &Post) -> Result<(), RepoError>;

    /// Fails with [`RepoError::NotFound`] when the author does not exist.
    async fn append_post_ref(&mut self, author_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepoError>;
}
