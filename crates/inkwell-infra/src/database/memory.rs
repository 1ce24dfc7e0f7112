//! In-memory storage - used when no database is configured, and in tests.
//!
//! Posts and authors live behind separate locks. Only a transaction commit
//! holds both, always taking the author table first.
//! Note: Data is lost on process restart.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use inkwell_core::domain::{Author, AuthorSummary, Post, PostContent};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    AuthorRepository, BaseRepository, PostRepository, StoreTransaction, TransactionManager,
};

/// Posts keyed by id, plus their insertion order.
#[derive(Default)]
struct PostTable {
    rows: HashMap<Uuid, Post>,
    order: Vec<Uuid>,
}

impl PostTable {
    fn insert(&mut self, post: Post) {
        if self.rows.insert(post.id, post.clone()).is_none() {
            self.order.push(post.id);
        }
    }

    fn remove(&mut self, id: Uuid) -> Option<Post> {
        let removed = self.rows.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(removed)
    }
}

#[derive(Default)]
struct Tables {
    authors: RwLock<HashMap<Uuid, Author>>,
    posts: RwLock<PostTable>,
}

/// Shared in-memory store. Hand out repositories with [`posts`](Self::posts),
/// [`authors`](Self::authors) and [`transactions`](Self::transactions); they
/// all see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn authors(&self) -> InMemoryAuthorRepository {
        InMemoryAuthorRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn transactions(&self) -> InMemoryTransactionManager {
        InMemoryTransactionManager {
            tables: self.tables.clone(),
        }
    }
}

/// In-memory post repository.
#[derive(Clone)]
pub struct InMemoryPostRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let posts = self.tables.posts.read().await;
        Ok(posts.rows.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.tables.posts.write().await;
        posts.insert(post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.tables.posts.write().await;
        posts.remove(id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        let posts = self.tables.posts.read().await;
        Ok(posts
            .order
            .iter()
            .filter_map(|id| posts.rows.get(id).cloned())
            .collect())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        let posts = self.tables.posts.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| posts.rows.get(id).cloned())
            .collect())
    }

    async fn find_missing_created_at(&self) -> Result<Vec<Post>, RepoError> {
        let posts = self.tables.posts.read().await;
        Ok(posts
            .order
            .iter()
            .filter_map(|id| posts.rows.get(id))
            .filter(|post| post.created_at.is_none())
            .cloned()
            .collect())
    }

    async fn update_content(
        &self,
        id: Uuid,
        content: PostContent,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        let mut posts = self.tables.posts.write().await;
        let Some(post) = posts.rows.get_mut(&id) else {
            return Ok(None);
        };

        post.title = content.title;
        post.body = content.body;
        post.image_ref = content.image_ref;
        post.updated_at = Some(updated_at);
        Ok(Some(post.clone()))
    }

    async fn set_timestamps_if_absent(
        &self,
        id: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let mut posts = self.tables.posts.write().await;
        match posts.rows.get_mut(&id) {
            Some(post) if post.created_at.is_none() => {
                post.created_at = Some(created_at);
                post.updated_at = Some(updated_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// In-memory author repository.
#[derive(Clone)]
pub struct InMemoryAuthorRepository {
    tables: Arc<Tables>,
}

#[async_trait]
impl BaseRepository<Author, Uuid> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, RepoError> {
        let authors = self.tables.authors.read().await;
        Ok(authors.get(&id).cloned())
    }

    async fn save(&self, author: Author) -> Result<Author, RepoError> {
        let mut authors = self.tables.authors.write().await;
        if authors
            .values()
            .any(|existing| existing.id != author.id && existing.email == author.email)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut authors = self.tables.authors.write().await;
        authors.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn find_all_summaries(&self) -> Result<Vec<AuthorSummary>, RepoError> {
        let authors = self.tables.authors.read().await;
        let mut summaries: Vec<AuthorSummary> = authors.values().map(Author::summary).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(summaries)
    }

    async fn find_summaries(&self, ids: &[Uuid]) -> Result<Vec<AuthorSummary>, RepoError> {
        let authors = self.tables.authors.read().await;
        let unique: HashSet<&Uuid> = ids.iter().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| authors.get(id).map(Author::summary))
            .collect())
    }

    async fn add_post_ref(&self, author_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        let mut authors = self.tables.authors.write().await;
        let author = authors.get_mut(&author_id).ok_or(RepoError::NotFound)?;
        if !author.posts.contains(&post_id) {
            author.posts.push(post_id);
        }
        Ok(())
    }

    async fn remove_post_ref(&self, author_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let mut authors = self.tables.authors.write().await;
        let author = authors.get_mut(&author_id).ok_or(RepoError::NotFound)?;
        let before = author.posts.len();
        author.posts.retain(|id| *id != post_id);
        Ok(author.posts.len() != before)
    }
}

/// Transactions over the in-memory tables.
#[derive(Clone)]
pub struct InMemoryTransactionManager {
    tables: Arc<Tables>,
}

#[async_trait]
impl TransactionManager for InMemoryTransactionManager {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, RepoError> {
        Ok(Box::new(InMemoryTransaction {
            tables: self.tables.clone(),
            posts: Vec::new(),
            refs: Vec::new(),
        }))
    }
}

/// Buffers writes until commit; dropping it discards them.
struct InMemoryTransaction {
    tables: Arc<Tables>,
    posts: Vec<Post>,
    refs: Vec<(Uuid, Uuid)>,
}

#[async_trait]
impl StoreTransaction for InMemoryTransaction {
    async fn insert_post(&mut self, post: &Post) -> Result<(), RepoError> {
        self.posts.push(post.clone());
        Ok(())
    }

    async fn append_post_ref(&mut self, author_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        if !self.tables.authors.read().await.contains_key(&author_id) {
            return Err(RepoError::NotFound);
        }
        self.refs.push((author_id, post_id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let InMemoryTransaction {
            tables,
            posts: staged_posts,
            refs,
        } = *self;
        let mut authors = tables.authors.write().await;
        let mut posts = tables.posts.write().await;

        // Validate everything before applying anything.
        if let Some(post) = staged_posts.iter().find(|p| posts.rows.contains_key(&p.id)) {
            return Err(RepoError::Constraint(format!("post {} already exists", post.id)));
        }
        if refs.iter().any(|(author_id, _)| !authors.contains_key(author_id)) {
            return Err(RepoError::NotFound);
        }

        for post in staged_posts {
            posts.insert(post);
        }
        for (author_id, post_id) in refs {
            if let Some(author) = authors.get_mut(&author_id) {
                if !author.posts.contains(&post_id) {
                    author.posts.push(post_id);
                }
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        Ok(())
    }
}
