//! # Author Service Module
//!
//! Routes under `/api/authors`. Authors are free-form JSON objects; `id` and the
//! `articles` back-reference list are managed by the server and ignored in bodies.
//!
//! *   **`POST /`**: create, `201 Created`.
//! *   **`GET /`**, **`GET /{author_id}`**: read.
//! *   **`GET /{author_id}/articles`**: the author's articles.
//! *   **`PUT /{author_id}`**, **`PATCH /{author_id}`**: replace or merge attributes.
//! *   **`DELETE /{author_id}`**: deletes the author together with its articles.

mod create;
mod delete;
mod get;
mod update;

use actix_web::web::{delete, get, patch, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/authors";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(get::list))
        .route("/{author_id}", get().to(get::process))
        .route("/{author_id}/articles", get().to(get::articles))
        .route("/{author_id}", put().to(update::replace))
        .route("/{author_id}", patch().to(update::merge))
        .route("/{author_id}", delete().to(delete::process))
}
