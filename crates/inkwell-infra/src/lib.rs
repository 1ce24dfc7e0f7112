//! # Inkwell Infrastructure
//!
//! Concrete implementations of the storage ports defined in `inkwell-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - Argon2 credential hashing

#[cfg(feature = "auth")]
pub mod auth;
pub mod database;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryStore};

// Re-exports - PostgreSQL
#[cfg(feature = "postgres")]
pub use database::{PostgresAuthorRepository, PostgresPostRepository, PostgresTransactionManager};

// Re-exports - Auth
#[cfg(feature = "auth")]
pub use auth::Argon2PasswordService;
