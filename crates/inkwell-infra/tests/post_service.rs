mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use uuid::Uuid;

use inkwell_core::DomainError;
use inkwell_core::domain::{Post, PostContent};
use inkwell_core::error::{Entity, RepoError};
use inkwell_core::ports::{
    AuthorRepository, BaseRepository, FixedClock, IdGenerator, PostRepository,
    StoreTransaction, TransactionManager,
};
use inkwell_core::PostService;
use inkwell_core::service::BackrefCleanup;
use inkwell_infra::InMemoryStore;

use common::{assert_consistent, ids, register_author, service, service_with_transactions};

fn content(title: &str) -> PostContent {
    PostContent::new(title, "World", "img.png")
}

/// Stages the post insert, then fails the back-reference append.
struct FailingAppend {
    inner: Arc<dyn TransactionManager>,
}

#[async_trait]
impl TransactionManager for FailingAppend {
    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, RepoError> {
        Ok(Box::new(FailingAppendTx {
            inner: self.inner.begin().await?,
        }))
    }
}

struct FailingAppendTx {
    inner: Box<dyn StoreTransaction>,
}

#[async_trait]
impl StoreTransaction for FailingAppendTx {
    async fn insert_post(&mut self, post: &Post) -> Result<(), RepoError> {
        self.inner.insert_post(post).await
    }

    async fn append_post_ref(&mut self, _author_id: Uuid, _post_id: Uuid) -> Result<(), RepoError> {
        Err(RepoError::Connection("connection reset".into()))
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        self.inner.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        self.inner.rollback().await
    }
}

#[tokio::test]
async fn create_links_post_to_author() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);

    let post = posts
        .create_post(author.id, PostContent::new("Hello", "World", "img.png"))
        .await
        .unwrap();

    assert_eq!(post.author_id, author.id);
    assert_eq!(post.title, "Hello");
    assert!(post.created_at.is_some());
    assert_eq!(post.created_at, post.updated_at);

    let author = store.authors().find_by_id(author.id).await.unwrap().unwrap();
    assert_eq!(author.posts, vec![post.id]);
    assert_consistent(&store, &[author.id]).await;
}

#[tokio::test]
async fn created_at_comes_from_the_post_id() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);

    let post = posts.create_post(author.id, content("Hello")).await.unwrap();

    assert_eq!(post.created_at, common::ids().extract_time(post.id));
}

#[tokio::test]
async fn create_against_missing_author_fails() {
    let store = InMemoryStore::new();
    let posts = service(&store);
    let ghost = Uuid::new_v4();

    let err = posts.create_post(ghost, content("Hello")).await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::NotFound { entity: Entity::Author, id } if id == ghost
    ));
    assert!(store.posts().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_empty_content() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);

    let err = posts
        .create_post(author.id, PostContent::new("Hello", "World", " "))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidArgument(_)));
    assert!(store.posts().find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn failure_between_writes_leaves_no_trace() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service_with_transactions(
        &store,
        Arc::new(FailingAppend {
            inner: Arc::new(store.transactions()),
        }),
    );

    let err = posts.create_post(author.id, content("Hello")).await.unwrap_err();

    assert!(matches!(err, DomainError::StorageFailure(RepoError::Connection(_))));
    assert!(store.posts().find_all().await.unwrap().is_empty());
    let author = store.authors().find_by_id(author.id).await.unwrap().unwrap();
    assert!(author.posts.is_empty());
}

#[tokio::test]
async fn update_replaces_content_only() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);
    let created = posts.create_post(author.id, content("Hello")).await.unwrap();

    let updated = posts
        .update_post(created.id, PostContent::new("Edited", "New body", "new.png"))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.author_id, author.id);
    assert_eq!(updated.title, "Edited");
    assert_eq!(updated.image_ref, "new.png");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
    assert_consistent(&store, &[author.id]).await;
}

#[tokio::test]
async fn update_stamps_updated_at_from_the_clock() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let created = service(&store)
        .create_post(author.id, content("Hello"))
        .await
        .unwrap();

    let edited_at = Utc.with_ymd_and_hms(2031, 5, 4, 12, 0, 0).unwrap();
    let posts = PostService::new(
        Arc::new(store.posts()),
        Arc::new(store.authors()),
        Arc::new(store.transactions()),
        ids(),
        Arc::new(FixedClock::new(edited_at)),
    );
    let updated = posts.update_post(created.id, content("Again")).await.unwrap();

    assert_eq!(updated.updated_at, Some(edited_at));
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_missing_post_is_not_found() {
    let store = InMemoryStore::new();
    let posts = service(&store);

    let err = posts
        .update_post(Uuid::now_v7(), content("Edited"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity: Entity::Post, .. }));
}

#[tokio::test]
async fn delete_removes_post_and_back_reference() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);
    let keep = posts.create_post(author.id, content("Keep")).await.unwrap();
    let gone = posts.create_post(author.id, content("Gone")).await.unwrap();

    let outcome = posts.delete_post(gone.id).await.unwrap();

    assert_eq!(outcome.backref, BackrefCleanup::Removed);
    assert!(store.posts().find_by_id(gone.id).await.unwrap().is_none());
    let author = store.authors().find_by_id(author.id).await.unwrap().unwrap();
    assert_eq!(author.posts, vec![keep.id]);
    assert_consistent(&store, &[author.id]).await;
}

#[tokio::test]
async fn delete_with_author_gone_still_succeeds() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);
    let post = posts.create_post(author.id, content("P1")).await.unwrap();

    store.authors().delete(author.id).await.unwrap();
    let outcome = posts.delete_post(post.id).await.unwrap();

    assert_eq!(outcome.backref, BackrefCleanup::AuthorMissing);
    assert!(outcome.backref.is_degraded());
    assert!(store.posts().find_by_id(post.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_post_is_not_found() {
    let store = InMemoryStore::new();
    let posts = service(&store);

    let err = posts.delete_post(Uuid::now_v7()).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity: Entity::Post, .. }));
}

#[tokio::test]
async fn back_reference_cleanup_is_retry_safe() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);
    let post = posts.create_post(author.id, content("P1")).await.unwrap();

    // Simulate a delete whose cleanup step never ran.
    store.posts().delete(post.id).await.unwrap();
    assert!(store.authors().remove_post_ref(author.id, post.id).await.unwrap());
    assert!(!store.authors().remove_post_ref(author.id, post.id).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deletes_lose_no_list_updates() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);

    let mut created = Vec::new();
    for i in 0..16 {
        created.push(posts.create_post(author.id, content(&format!("Post {i}"))).await.unwrap());
    }
    let (doomed, kept) = created.split_at(8);

    let deletes = doomed.iter().map(|post| {
        let posts = posts.clone();
        let id = post.id;
        tokio::spawn(async move { posts.delete_post(id).await })
    });
    for result in futures::future::join_all(deletes).await {
        assert_eq!(result.unwrap().unwrap().backref, BackrefCleanup::Removed);
    }

    let author = store.authors().find_by_id(author.id).await.unwrap().unwrap();
    let kept: Vec<Uuid> = kept.iter().map(|post| post.id).collect();
    assert_eq!(author.posts, kept);
    assert_consistent(&store, &[author.id]).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_and_deletes_on_one_author() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);

    let mut existing = Vec::new();
    for i in 0..16 {
        existing.push(posts.create_post(author.id, content(&format!("Post {i}"))).await.unwrap());
    }
    let (doomed, kept) = existing.split_at(8);

    let deletes = futures::future::join_all(doomed.iter().map(|post| {
        let posts = posts.clone();
        let id = post.id;
        tokio::spawn(async move { posts.delete_post(id).await })
    }));
    let creates = futures::future::join_all((0..8).map(|i| {
        let posts = posts.clone();
        let author_id = author.id;
        tokio::spawn(async move {
            posts
                .create_post(author_id, content(&format!("New {i}")))
                .await
        })
    }));
    let (deleted, created) = futures::future::join(deletes, creates).await;

    for result in deleted {
        assert_eq!(result.unwrap().unwrap().backref, BackrefCleanup::Removed);
    }
    let created: Vec<Uuid> = created
        .into_iter()
        .map(|result| result.unwrap().unwrap().id)
        .collect();

    let author = store.authors().find_by_id(author.id).await.unwrap().unwrap();
    let kept: Vec<Uuid> = kept.iter().map(|post| post.id).collect();
    assert_eq!(author.posts[..kept.len()], kept[..]);

    let mut listed = author.posts.clone();
    let mut expected: Vec<Uuid> = kept.iter().chain(&created).copied().collect();
    listed.sort();
    expected.sort();
    assert_eq!(listed, expected);
    assert_consistent(&store, &[author.id]).await;
}

#[tokio::test]
async fn mixed_operations_preserve_the_invariant() {
    let store = InMemoryStore::new();
    let a1 = register_author(&store, "A1").await;
    let a2 = register_author(&store, "A2").await;
    let posts = service(&store);

    let p1 = posts.create_post(a1.id, content("One")).await.unwrap();
    assert_consistent(&store, &[a1.id, a2.id]).await;
    let p2 = posts.create_post(a2.id, content("Two")).await.unwrap();
    assert_consistent(&store, &[a1.id, a2.id]).await;
    posts.update_post(p1.id, content("One, edited")).await.unwrap();
    assert_consistent(&store, &[a1.id, a2.id]).await;
    posts.delete_post(p2.id).await.unwrap();
    assert_consistent(&store, &[a1.id, a2.id]).await;
    posts.create_post(a2.id, content("Three")).await.unwrap();
    assert_consistent(&store, &[a1.id, a2.id]).await;
}

#[tokio::test]
async fn get_post_joins_author_summary() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);
    let created = posts.create_post(author.id, content("Hello")).await.unwrap();

    let found = posts.get_post(created.id).await.unwrap();

    assert_eq!(found.post, created);
    assert_eq!(found.author, Some(author.summary()));
}

#[tokio::test]
async fn get_post_without_author_returns_post_alone() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);
    let created = posts.create_post(author.id, content("Hello")).await.unwrap();
    store.authors().delete(author.id).await.unwrap();

    let found = posts.get_post(created.id).await.unwrap();

    assert_eq!(found.post.id, created.id);
    assert!(found.author.is_none());
}

#[tokio::test]
async fn get_missing_post_is_not_found() {
    let store = InMemoryStore::new();
    let posts = service(&store);

    let err = posts.get_post(Uuid::now_v7()).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity: Entity::Post, .. }));
}

#[tokio::test]
async fn listing_by_author_skips_dangling_references() {
    let store = InMemoryStore::new();
    let author = register_author(&store, "A1").await;
    let posts = service(&store);
    let first = posts.create_post(author.id, content("First")).await.unwrap();
    let second = posts.create_post(author.id, content("Second")).await.unwrap();
    let dangling = Uuid::now_v7();
    store.authors().add_post_ref(author.id, dangling).await.unwrap();

    let listing = posts.list_posts_by_author(author.id).await.unwrap();

    let ids: Vec<Uuid> = listing.posts.iter().map(|post| post.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
    assert_eq!(listing.dangling, vec![dangling]);
    assert_eq!(listing.author, author.summary());
}

#[tokio::test]
async fn listing_by_author_ignores_posts_of_other_authors() {
    let store = InMemoryStore::new();
    let a1 = register_author(&store, "A1").await;
    let a2 = register_author(&store, "A2").await;
    let posts = service(&store);
    let foreign = posts.create_post(a2.id, content("Theirs")).await.unwrap();
    store.authors().add_post_ref(a1.id, foreign.id).await.unwrap();

    let listing = posts.list_posts_by_author(a1.id).await.unwrap();

    assert!(listing.posts.is_empty());
    assert_eq!(listing.dangling, vec![foreign.id]);
}

#[tokio::test]
async fn listing_missing_author_is_not_found() {
    let store = InMemoryStore::new();
    let posts = service(&store);

    let err = posts.list_posts_by_author(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound { entity: Entity::Author, .. }));
}

#[tokio::test]
async fn list_all_posts_in_creation_order_with_authors() {
    let store = InMemoryStore::new();
    let a1 = register_author(&store, "A1").await;
    let a2 = register_author(&store, "A2").await;
    let posts = service(&store);
    let first = posts.create_post(a1.id, content("First")).await.unwrap();
    let second = posts.create_post(a2.id, content("Second")).await.unwrap();
    let third = posts.create_post(a1.id, content("Third")).await.unwrap();

    let all = posts.list_all_posts().await.unwrap();

    let ids: Vec<Uuid> = all.iter().map(|entry| entry.post.id).collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
    assert_eq!(all[1].author, Some(a2.summary()));
    assert_eq!(all[2].author, Some(a1.summary()));
}

#[tokio::test]
async fn list_all_posts_on_empty_store() {
    let store = InMemoryStore::new();
    let posts = service(&store);

    assert!(posts.list_all_posts().await.unwrap().is_empty());
}
