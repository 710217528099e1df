use actix_web::web;

use crate::handlers::{create_handler, redirect_handler};

// Configure short URL routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/shorten", web::post().to(create_handler))
            // Bare /api and /api/ reach the handler so it can report the missing id
            .route("", web::get().to(redirect_handler))
            .route("/", web::get().to(redirect_handler))
            .route("/{short_url}", web::get().to(redirect_handler)),
    );
}
