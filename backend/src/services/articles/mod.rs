//! # Article Service Module
//!
//! Routes under `/api/articles`:
//!
//! *   **`POST /`** (`create::process`): validates and stores a new article, then links
//!     it to its author. `201 Created` with the stored article.
//! *   **`GET /`** (`get::list`): every article.
//! *   **`GET /{article_id}`** (`get::process`): one article, `404` when absent.
//! *   **`PUT /{article_id}`** (`update::replace`): full replace, all required fields.
//! *   **`PATCH /{article_id}`** (`update::merge`): partial update, merged then validated.
//! *   **`DELETE /{article_id}`** (`delete::process`): removes the article and unlinks it
//!     from its author. `200 OK` with the deleted article.

mod create;
mod delete;
mod get;
mod update;

use actix_web::web::{delete, get, patch, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/articles";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(get::list))
        .route("/{article_id}", get().to(get::process))
        .route("/{article_id}", put().to(update::replace))
        .route("/{article_id}", patch().to(update::merge))
        .route("/{article_id}", delete().to(delete::process))
}
