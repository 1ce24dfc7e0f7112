//! One-shot repair for posts written before creation timestamps existed.
//!
//! The creation instant of such a post is recovered from its own id, so the
//! repair never depends on any other field and never touches a post that
//! already has `created_at`.

use std::sync::Arc;

use serde::Serialize;

use crate::error::DomainError;
use crate::ports::{IdGenerator, PostRepository};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub migrated_count: usize,
    pub skipped: usize,
}

pub struct TimestampBackfill {
    posts: Arc<dyn PostRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl TimestampBackfill {
    pub fn new(posts: Arc<dyn PostRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { posts, ids }
    }

    /// Stamp `created_at` and `updated_at` on every post missing them.
    ///
    /// Only the initial scan can fail the run; a post that cannot be
    /// migrated is logged, counted as skipped, and the batch moves on.
    pub async fn run(&self) -> Result<BackfillReport, DomainError> {
        let pending = self.posts.find_missing_created_at().await?;
        tracing::info!(pending = pending.len(), "Starting timestamp backfill");

        let mut report = BackfillReport::default();
        for post in pending {
            let Some(created_at) = self.ids.extract_time(post.id) else {
                tracing::warn!(post_id = %post.id, "Post id carries no timestamp, skipping");
                report.skipped += 1;
                continue;
            };

            match self
                .posts
                .set_timestamps_if_absent(post.id, created_at, created_at)
                .await
            {
                Ok(true) => report.migrated_count += 1,
                Ok(false) => {
                    tracing::debug!(
                        post_id = %post.id,
                        "Post deleted or already stamped during backfill"
                    );
                    report.skipped += 1;
                }
                Err(err) => {
                    tracing::warn!(post_id = %post.id, error = %err, "Failed to backfill post");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            migrated = report.migrated_count,
            skipped = report.skipped,
            "Timestamp backfill finished"
        );
        Ok(report)
    }
}
