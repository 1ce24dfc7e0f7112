//! Application services - operations that span more than one port.

mod authors;
mod backfill;
mod posts;

pub use authors::AuthorService;
pub use backfill::{BackfillReport, TimestampBackfill};
pub use posts::{BackrefCleanup, DeleteOutcome, PostService};
