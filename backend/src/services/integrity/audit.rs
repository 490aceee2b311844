use crate::catalog::Catalog;
use actix_web::{web, HttpResponse, Responder, ResponseError};

pub(crate) async fn process(catalog: web::Data<Catalog>) -> impl Responder {
    match catalog.audit() {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => e.error_response(),
    }
}
