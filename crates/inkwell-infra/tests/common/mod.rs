#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use inkwell_core::PostService;
use inkwell_core::domain::{Author, Post};
use inkwell_core::ports::{
    AuthorRepository, BaseRepository, IdGenerator, PostRepository, SystemClock,
    TransactionManager, UuidV7Generator,
};
use inkwell_infra::InMemoryStore;

pub fn service(store: &InMemoryStore) -> PostService {
    service_with_transactions(store, Arc::new(store.transactions()))
}

pub fn service_with_transactions(
    store: &InMemoryStore,
    transactions: Arc<dyn TransactionManager>,
) -> PostService {
    PostService::new(
        Arc::new(store.posts()),
        Arc::new(store.authors()),
        transactions,
        ids(),
        Arc::new(SystemClock),
    )
}

pub fn ids() -> Arc<dyn IdGenerator> {
    Arc::new(UuidV7Generator::new(SystemClock))
}

pub async fn register_author(store: &InMemoryStore, name: &str) -> Author {
    let author = Author::new(
        name.to_string(),
        format!("{}@example.com", name.to_lowercase()),
        "hash".to_string(),
    );
    store.authors().save(author).await.unwrap()
}

/// Seed a post the way the pre-timestamp code wrote them: list entry, no times.
pub async fn seed_legacy_post(
    store: &InMemoryStore,
    author_id: Uuid,
    minted_at: DateTime<Utc>,
) -> Post {
    let secs = u64::try_from(minted_at.timestamp()).unwrap();
    let id = Uuid::new_v7(uuid::Timestamp::from_unix(
        uuid::NoContext,
        secs,
        minted_at.timestamp_subsec_nanos(),
    ));
    let post = Post {
        id,
        author_id,
        title: "Legacy".to_string(),
        body: "Written before timestamps".to_string(),
        image_ref: "old.png".to_string(),
        created_at: None,
        updated_at: None,
    };
    let post = store.posts().save(post).await.unwrap();
    store.authors().add_post_ref(author_id, post.id).await.unwrap();
    post
}

/// Both directions of the author/post relation hold for every record.
pub async fn assert_consistent(store: &InMemoryStore, authors: &[Uuid]) {
    for post in store.posts().find_all().await.unwrap() {
        let author = store
            .authors()
            .find_by_id(post.author_id)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("post {} has no author", post.id));
        assert!(
            author.posts.contains(&post.id),
            "author {} does not list post {}",
            author.id,
            post.id
        );
    }

    for author_id in authors {
        let Some(author) = store.authors().find_by_id(*author_id).await.unwrap() else {
            continue;
        };
        for post_id in &author.posts {
            let post = store
                .posts()
                .find_by_id(*post_id)
                .await
                .unwrap()
                .unwrap_or_else(|| panic!("author {} lists missing post {post_id}", author.id));
            assert_eq!(post.author_id, author.id);
        }
    }
}
