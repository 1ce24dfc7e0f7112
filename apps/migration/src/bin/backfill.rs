//! Stamp `created_at`/`updated_at` on legacy posts from their ids.
//!
//! Safe to re-run: posts that already have a creation time are never touched.

use std::sync::Arc;

use anyhow::Context;

use inkwell_core::TimestampBackfill;
use inkwell_core::ports::{SystemClock, UuidV7Generator};
use inkwell_infra::database::{DatabaseConfig, PostgresPostRepository, connect};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter("info").init();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let mut config = DatabaseConfig::new(url);
    config.max_connections = 5;
    config.min_connections = 1;

    let conn = connect(&config)
        .await
        .context("failed to connect to database")?;

    let backfill = TimestampBackfill::new(
        Arc::new(PostgresPostRepository::new(conn)),
        Arc::new(UuidV7Generator::new(SystemClock)),
    );
    let report = backfill.run().await.context("timestamp backfill failed")?;

    tracing::info!(
        migrated = report.migrated_count,
        skipped = report.skipped,
        "Migrated {} posts with timestamps",
        report.migrated_count
    );
    Ok(())
}
