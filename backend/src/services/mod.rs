//! # HTTP Services
//!
//! Route scopes over the `Catalog`, one sub-module per resource:
//!
//! - `articles`: `/api/articles`
//! - `authors`: `/api/authors`
//! - `integrity`: `/api/integrity`
//!
//! Handlers take the shared `web::Data<Catalog>` and a JSON body when they need one,
//! call a single catalog operation and map the outcome to a response. Catalog errors
//! render themselves through `ResponseError` (see `crate::error`).

pub mod articles;
pub mod authors;
pub mod integrity;

use crate::error::CatalogError;
use actix_web::web;
use common::model::document::Document;
use serde_json::Value;

/// Registers every catalog scope. Expects `web::Data<Catalog>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(articles::configure_routes())
        .service(authors::configure_routes())
        .service(integrity::configure_routes());
}

/// JSON extractor settings: size limit, and body errors reported like validation errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| CatalogError::malformed(err.to_string()).into())
}

/// Request bodies must be JSON objects.
pub(crate) fn into_document(value: Value) -> Result<Document, CatalogError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CatalogError::malformed(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
