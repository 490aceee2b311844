use crate::catalog::Catalog;
use crate::services::into_document;
use actix_web::{web, HttpResponse, Responder, ResponseError};
use serde_json::Value;

pub async fn process(catalog: web::Data<Catalog>, payload: web::Json<Value>) -> impl Responder {
    let created = into_document(payload.into_inner())
        .and_then(|document| catalog.create_author(document));

    match created {
        Ok(author) => HttpResponse::Created().json(author),
        Err(e) => e.error_response(),
    }
}
