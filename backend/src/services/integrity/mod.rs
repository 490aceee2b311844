mod audit;

use actix_web::web;

const API_PATH: &str = "/api/integrity";

/// `GET /api/integrity` reports where authors and articles disagree.
pub fn configure_routes() -> actix_web::Scope {
    web::scope(API_PATH).route("", web::get().to(audit::process))
}
