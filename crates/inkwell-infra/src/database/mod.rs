//! Storage adapters: in-memory tables and PostgreSQL via SeaORM.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;
#[cfg(feature = "postgres")]
mod postgres_tx;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
pub use memory::{
    InMemoryAuthorRepository, InMemoryPostRepository, InMemoryStore, InMemoryTransactionManager,
};

#[cfg(feature = "postgres")]
pub use connections::connect;
#[cfg(feature = "postgres")]
pub use postgres_base::PostgresBaseRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresAuthorRepository, PostgresPostRepository};
#[cfg(feature = "postgres")]
pub use postgres_tx::PostgresTransactionManager;
