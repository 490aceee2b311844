use crate::catalog::Catalog;
use actix_web::{web, HttpResponse, Responder, ResponseError};

pub async fn list(catalog: web::Data<Catalog>) -> impl Responder {
    match catalog.list_authors() {
        Ok(authors) => HttpResponse::Ok().json(authors),
        Err(e) => e.error_response(),
    }
}

pub async fn process(catalog: web::Data<Catalog>, author_id: web::Path<String>) -> impl Responder {
    match catalog.get_author(&author_id) {
        Ok(author) => HttpResponse::Ok().json(author),
        Err(e) => e.error_response(),
    }
}

/// `GET /api/authors/{author_id}/articles`, read from the articles themselves rather
/// than from the author's back-reference list.
pub async fn articles(catalog: web::Data<Catalog>, author_id: web::Path<String>) -> impl Responder {
    match catalog.articles_by_author(&author_id) {
        Ok(articles) => HttpResponse::Ok().json(articles),
        Err(e) => e.error_response(),
    }
}
