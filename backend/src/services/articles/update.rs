use crate::catalog::Catalog;
use crate::services::into_document;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::Value;

/// `PUT /api/articles/{article_id}`: the body must be a complete article.
pub async fn replace(
    catalog: web::Data<Catalog>,
    article_id: web::Path<String>,
    payload: web::Json<Value>,
) -> impl Responder {
    let replaced = into_document(payload.into_inner())
        .and_then(|document| catalog.replace_article(&article_id, document));

    match replaced {
        Ok(article) => HttpResponse::Ok().json(article),
        Err(e) => e.error_response(),
    }
}

/// `PATCH /api/articles/{article_id}`: any subset of fields.
pub async fn merge(
    catalog: web::Data<Catalog>,
    article_id: web::Path<String>,
    payload: web::Json<Value>,
) -> impl Responder {
    let merged = into_document(payload.into_inner())
        .and_then(|patch| catalog.merge_article(&article_id, patch));

    match merged {
        Ok(article) => HttpResponse::Ok().json(article),
        Err(e) => e.error_response(),
    }
}
