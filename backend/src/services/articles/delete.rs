use crate::catalog::Catalog;
use actix_web::{web, HttpResponse, Responder, ResponseError};

pub async fn process(catalog: web::Data<Catalog>, article_id: web::Path<String>) -> impl Responder {
    match catalog.delete_article(&article_id) {
        Ok(article) => HttpResponse::Ok().json(article),
        Err(e) => e.error_response(),
    }
}
