use crate::catalog::Catalog;
use actix_web::{web, HttpResponse, Responder, ResponseError};

/// `DELETE /api/authors/{author_id}`: the author's articles go with it.
pub async fn process(catalog: web::Data<Catalog>, author_id: web::Path<String>) -> impl Responder {
    match catalog.delete_author(&author_id) {
        Ok(author) => HttpResponse::Ok().json(author),
        Err(e) => e.error_response(),
    }
}
