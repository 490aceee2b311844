use crate::catalog::Catalog;
use actix_web::{web, HttpResponse, Responder, ResponseError};

pub async fn list(catalog: web::Data<Catalog>) -> impl Responder {
    match catalog.list_articles() {
        Ok(articles) => HttpResponse::Ok().json(articles),
        Err(e) => e.error_response(),
    }
}

pub async fn process(catalog: web::Data<Catalog>, article_id: web::Path<String>) -> impl Responder {
    match catalog.get_article(&article_id) {
        Ok(article) => HttpResponse::Ok().json(article),
        Err(e) => e.error_response(),
    }
}
