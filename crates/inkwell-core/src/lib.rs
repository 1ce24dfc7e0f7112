//! # Inkwell Core
//!
//! The domain layer of the Inkwell blog service.
//! This crate holds the Author/Post aggregates, the storage ports they are
//! persisted through, and the services that keep the two consistent.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::{AuthorService, PostService, TimestampBackfill};
