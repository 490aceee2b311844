use crate::catalog::Catalog;
use crate::services::into_document;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::Value;

/// `POST /api/articles`
///
/// - `201 Created` with the article as stored (id filled in).
/// - `404 Not Found` when `author` names no existing author.
/// - `400 Bad Request` with the violations when validation fails.
pub async fn process(catalog: web::Data<Catalog>, payload: web::Json<Value>) -> impl Responder {
    let created = into_document(payload.into_inner())
        .and_then(|document| catalog.create_article(document));

    match created {
        Ok(article) => HttpResponse::Created().json(article),
        Err(e) => e.error_response(),
    }
}
