//! Post lifecycle across the post and author stores.
//!
//! Creating a post inserts the post and appends its id to the author's list
//! in one transaction. Deleting is two steps: the post row goes first and is
//! the authoritative outcome; removing the back-reference is best effort and
//! reported through [`BackrefCleanup`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{AuthorPosts, Post, PostContent, PostWithAuthor};
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthorRepository, Clock, IdGenerator, PostRepository, TransactionManager};

/// What happened to the author's back-reference after a post was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum BackrefCleanup {
    Removed,
    /// The id was not on the list; a retried cleanup lands here.
    AlreadyAbsent,
    AuthorMissing,
    Failed(String),
}

impl BackrefCleanup {
    /// Whether the author's list may still reference the deleted post.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::AuthorMissing | Self::Failed(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub backref: BackrefCleanup,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    authors: Arc<dyn AuthorRepository>,
    transactions: Arc<dyn TransactionManager>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        authors: Arc<dyn AuthorRepository>,
        transactions: Arc<dyn TransactionManager>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            posts,
            authors,
            transactions,
            ids,
            clock,
        }
    }

    pub async fn create_post(
        &self,
        author_id: Uuid,
        content: PostContent,
    ) -> Result<Post, DomainError> {
        content.validate()?;

        if self.authors.find_by_id(author_id).await?.is_none() {
            return Err(DomainError::author_not_found(author_id));
        }

        // The id is the single source of truth for the creation time.
        let id = self.ids.generate();
        let created_at = self.ids.extract_time(id).ok_or_else(|| {
            RepoError::Constraint(format!("generated id {id} carries no timestamp"))
        })?;
        let post = Post::new(id, author_id, content, created_at);

        let mut tx = self.transactions.begin().await?;
        let staged = match tx.insert_post(&post).await {
            Ok(()) => tx.append_post_ref(author_id, post.id).await,
            Err(err) => Err(err),
        };

        if let Err(err) = staged {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(
                    post_id = %post.id,
                    error = %rollback_err,
                    "Rollback of post creation failed"
                );
            }
            return Err(creation_error(err, author_id));
        }

        tx.commit()
            .await
            .map_err(|err| creation_error(err, author_id))?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    pub async fn update_post(
        &self,
        post_id: Uuid,
        content: PostContent,
    ) -> Result<Post, DomainError> {
        content.validate()?;

        let post = self
            .posts
            .update_content(post_id, content, self.clock.now())
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        tracing::info!(post_id = %post_id, "Post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: Uuid) -> Result<DeleteOutcome, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        match self.posts.delete(post_id).await {
            Ok(()) => {}
            // Another request deleted it between our read and our delete.
            Err(RepoError::NotFound) => return Err(DomainError::post_not_found(post_id)),
            Err(err) => return Err(err.into()),
        }

        let backref = match self.authors.remove_post_ref(post.author_id, post_id).await {
            Ok(true) => BackrefCleanup::Removed,
            Ok(false) => BackrefCleanup::AlreadyAbsent,
            Err(RepoError::NotFound) => BackrefCleanup::AuthorMissing,
            Err(err) => BackrefCleanup::Failed(err.to_string()),
        };

        if backref.is_degraded() {
            tracing::warn!(
                post_id = %post_id,
                author_id = %post.author_id,
                cleanup = ?backref,
                "Post deleted but author back-reference was not cleaned up"
            );
        } else {
            tracing::info!(post_id = %post_id, author_id = %post.author_id, "Post deleted");
        }

        Ok(DeleteOutcome {
            post_id,
            author_id: post.author_id,
            backref,
        })
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostWithAuthor, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        let author = self
            .authors
            .find_summaries(&[post.author_id])
            .await?
            .into_iter()
            .next();

        if author.is_none() {
            tracing::warn!(
                post_id = %post_id,
                author_id = %post.author_id,
                "Post author is missing"
            );
        }

        Ok(PostWithAuthor { post, author })
    }

    /// An author's posts in list order. Ids on the list that do not resolve
    /// to one of this author's posts are skipped and returned as `dangling`.
    pub async fn list_posts_by_author(&self, author_id: Uuid) -> Result<AuthorPosts, DomainError> {
        let author = self
            .authors
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::author_not_found(author_id))?;

        let posts: Vec<Post> = self
            .posts
            .find_by_ids(&author.posts)
            .await?
            .into_iter()
            .filter(|post| post.author_id == author_id)
            .collect();

        let resolved: HashSet<Uuid> = posts.iter().map(|post| post.id).collect();
        let dangling: Vec<Uuid> = author
            .posts
            .iter()
            .copied()
            .filter(|id| !resolved.contains(id))
            .collect();

        if !dangling.is_empty() {
            tracing::warn!(
                author_id = %author_id,
                dangling = dangling.len(),
                "Author lists posts that no longer exist"
            );
        }

        Ok(AuthorPosts {
            author: author.summary(),
            posts,
            dangling,
        })
    }

    /// Every post in creation order, each joined with its author.
    pub async fn list_all_posts(&self) -> Result<Vec<PostWithAuthor>, DomainError> {
        let posts = self.posts.find_all().await?;

        let author_ids: Vec<Uuid> = posts
            .iter()
            .map(|post| post.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let authors: HashMap<Uuid, _> = self
            .authors
            .find_summaries(&author_ids)
            .await?
            .into_iter()
            .map(|summary| (summary.id, summary))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author_id).cloned();
                PostWithAuthor { post, author }
            })
            .collect())
    }
}

fn creation_error(err: RepoError, author_id: Uuid) -> DomainError {
    match err {
        // The author vanished after the existence check.
        RepoError::NotFound => DomainError::author_not_found(author_id),
        other => other.into(),
    }
}
