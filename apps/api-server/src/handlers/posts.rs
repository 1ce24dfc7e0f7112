//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::{AuthorSummary, Post, PostContent};
use inkwell_core::ports::IdGenerator;
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{
    AuthorPostsResponse, AuthorResponse, CreatePostRequest, DeletePostResponse, PostResponse,
    UpdatePostRequest,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn author_response(author: AuthorSummary) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        name: author.name,
        email: author.email,
    }
}

/// Legacy posts without a stored `created_at` still report when they were
/// written, read back from the id.
pub(crate) fn post_response(
    post: Post,
    author: Option<AuthorSummary>,
    ids: &dyn IdGenerator,
) -> PostResponse {
    let formatted_created_at = post.created_at.or_else(|| ids.extract_time(post.id));

    PostResponse {
        id: post.id,
        title: post.title,
        body: post.body,
        image: post.image_ref,
        author_id: post.author_id,
        author: author.map(author_response),
        created_at: post.created_at,
        updated_at: post.updated_at,
        formatted_created_at,
    }
}

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts: Vec<PostResponse> = state
        .posts
        .list_all_posts()
        .await?
        .into_iter()
        .map(|entry| post_response(entry.post, entry.author, state.ids.as_ref()))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create_post(req.author, PostContent::new(req.title, req.body, req.image))
        .await?;

    let post = post_response(post, None, state.ids.as_ref());
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let found = state.posts.get_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(
        found.post,
        found.author,
        state.ids.as_ref(),
    ))))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .update_post(
            path.into_inner(),
            PostContent::new(req.title, req.body, req.image),
        )
        .await?;

    let post = post_response(post, None, state.ids.as_ref());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    // A degraded back-reference cleanup is logged by the service, not reported.
    let outcome = state.posts.delete_post(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        DeletePostResponse {
            id: outcome.post_id,
        },
        "Deleted successfully",
    )))
}

/// GET /api/authors/{id}/posts
pub async fn list_author_posts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let listing = state.posts.list_posts_by_author(path.into_inner()).await?;

    let author = author_response(listing.author);
    let posts = listing
        .posts
        .into_iter()
        .map(|post| post_response(post, None, state.ids.as_ref()))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthorPostsResponse { author, posts })))
}
