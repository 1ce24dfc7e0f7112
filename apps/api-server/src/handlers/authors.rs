//! Author handlers.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::Registration;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{AuthorResponse, RegisterAuthorRequest};

use super::posts::author_response;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/authors
pub async fn list_authors(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let authors: Vec<AuthorResponse> = state
        .authors
        .list_authors()
        .await?
        .into_iter()
        .map(author_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(authors)))
}

/// POST /api/authors
pub async fn register_author(
    state: web::Data<AppState>,
    body: web::Json<RegisterAuthorRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let author = state
        .authors
        .register(Registration::new(req.name, req.email, req.password))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(author_response(author))))
}
