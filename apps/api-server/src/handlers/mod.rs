//! HTTP handlers and route configuration.

mod admin;
mod authors;
mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Malformed ids and bodies are client errors, not missing routes.
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("", web::post().to(posts::create_post))
                    .route("/{id}", web::get().to(posts::get_post))
                    .route("/{id}", web::put().to(posts::update_post))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .service(
                web::scope("/authors")
                    .route("", web::get().to(authors::list_authors))
                    .route("", web::post().to(authors::register_author))
                    .route("/{id}/posts", web::get().to(posts::list_author_posts)),
            )
            .route(
                "/admin/backfill/post-timestamps",
                web::post().to(admin::backfill_post_timestamps),
            ),
    );
}
