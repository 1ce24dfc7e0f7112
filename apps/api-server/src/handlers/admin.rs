//! Operator endpoints.

use actix_web::{HttpResponse, web};

use inkwell_shared::ApiResponse;
use inkwell_shared::dto::BackfillResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/admin/backfill/post-timestamps
pub async fn backfill_post_timestamps(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let report = state.backfill.run().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        BackfillResponse {
            migrated_count: report.migrated_count,
            skipped: report.skipped,
        },
        format!(
            "Successfully migrated {} posts with timestamps",
            report.migrated_count
        ),
    )))
}
