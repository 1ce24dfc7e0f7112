//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{
    AuthorRepository, Clock, IdGenerator, PostRepository, SystemClock, TransactionManager,
    UuidV7Generator,
};
use inkwell_core::{AuthorService, PostService, TimestampBackfill};
use inkwell_infra::{Argon2PasswordService, DatabaseConfig, InMemoryStore};

#[cfg(feature = "postgres")]
use inkwell_infra::{PostgresAuthorRepository, PostgresPostRepository, PostgresTransactionManager};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub authors: AuthorService,
    pub backfill: Arc<TimestampBackfill>,
    pub ids: Arc<dyn IdGenerator>,
}

impl AppState {
    /// Build the application state, falling back to in-memory storage when
    /// no database is configured or reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(config) = db_config {
                match inkwell_infra::database::connect(config).await {
                    Ok(conn) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self::from_ports(
                            Arc::new(PostgresPostRepository::new(conn.clone())),
                            Arc::new(PostgresAuthorRepository::new(conn.clone())),
                            Arc::new(PostgresTransactionManager::new(conn)),
                        );
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory store");
        }

        tracing::info!("Application state initialized (in-memory)");
        Self::in_memory(&InMemoryStore::new())
    }

    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self::from_ports(
            Arc::new(store.posts()),
            Arc::new(store.authors()),
            Arc::new(store.transactions()),
        )
    }

    fn from_ports(
        posts: Arc<dyn PostRepository>,
        authors: Arc<dyn AuthorRepository>,
        transactions: Arc<dyn TransactionManager>,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidV7Generator::new(SystemClock));

        Self {
            posts: PostService::new(
                posts.clone(),
                authors.clone(),
                transactions,
                ids.clone(),
                clock,
            ),
            authors: AuthorService::new(authors, Arc::new(Argon2PasswordService::new())),
            backfill: Arc::new(TimestampBackfill::new(posts, ids.clone())),
            ids,
        }
    }
}
