//! Catalog errors and their HTTP mapping.
//!
//! | Error | Status |
//! |---|---|
//! | `Validation` | 400 Bad Request, with the list of violations |
//! | `ReferenceNotFound` | 404 Not Found |
//! | `NotFound` | 404 Not Found |
//! | `Store` | 500 Internal Server Error |

use crate::store::StoreError;
use crate::validation::{ValidationError, Violation};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A field names an entity that does not exist
    #[error("{field} references unknown id '{id}'")]
    ReferenceNotFound { field: &'static str, id: String },

    /// The target of the operation does not exist
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn article_not_found(id: &str) -> Self {
        CatalogError::NotFound {
            entity: "article",
            id: id.to_string(),
        }
    }

    pub fn author_not_found(id: &str) -> Self {
        CatalogError::NotFound {
            entity: "author",
            id: id.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        CatalogError::Validation(ValidationError::single(Violation::Malformed {
            reason: reason.into(),
        }))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "validation_failed",
            CatalogError::ReferenceNotFound { .. } => "reference_not_found",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::Store(_) => "store_error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a [Violation]>,
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::ReferenceNotFound { .. } | CatalogError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let CatalogError::Store(e) = self {
            error!("Store failure: {}", e);
        }

        let violations = match self {
            CatalogError::Validation(e) => Some(e.violations.as_slice()),
            _ => None,
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            violations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let validation = CatalogError::malformed("expected an object");
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            CatalogError::ReferenceNotFound {
                field: "author",
                id: "x".into()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::article_not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::Store(StoreError::Poisoned).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            CatalogError::author_not_found("a1").to_string(),
            "author 'a1' not found"
        );
        assert_eq!(
            CatalogError::ReferenceNotFound {
                field: "author",
                id: "a1".into()
            }
            .to_string(),
            "author references unknown id 'a1'"
        );
    }
}
