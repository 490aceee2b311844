use crate::catalog::Catalog;
use crate::services::into_document;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::Value;

pub async fn replace(
    catalog: web::Data<Catalog>,
    author_id: web::Path<String>,
    payload: web::Json<Value>,
) -> impl Responder {
    let replaced = into_document(payload.into_inner())
        .and_then(|document| catalog.replace_author(&author_id, document));

    match replaced {
        Ok(author) => HttpResponse::Ok().json(author),
        Err(e) => e.error_response(),
    }
}

pub async fn merge(
    catalog: web::Data<Catalog>,
    author_id: web::Path<String>,
    payload: web::Json<Value>,
) -> impl Responder {
    let merged = into_document(payload.into_inner())
        .and_then(|document| catalog.merge_author(&author_id, document));

    match merged {
        Ok(author) => HttpResponse::Ok().json(author),
        Err(e) => e.error_response(),
    }
}
