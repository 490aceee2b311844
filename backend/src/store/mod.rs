//! # Document Store
//!
//! The catalog keeps articles and authors as JSON documents in named collections.
//! Nothing in the store knows about either entity: there are no foreign keys, no
//! cascades and no multi-document transactions. Relationship upkeep is the job of
//! `crate::catalog::coordinator`.
//!
//! Every document carries a string `id`, which is its primary key and never changes
//! once inserted. Each call on a `DocumentStore` is atomic on its own. Sequences of
//! calls are not.

mod sqlite;

pub use sqlite::SqliteStore;

use common::model::document::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failure inside SQLite
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored body or an outgoing value could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no string `id`
    #[error("Document has no string 'id' field")]
    MissingId,

    /// An insert reused an id already present in the collection
    #[error("Duplicate id '{0}'")]
    DuplicateId(String),

    /// Collection names become table names and are restricted to `[A-Za-z0-9_]`
    #[error("Invalid collection name '{0}'")]
    InvalidCollection(String),

    /// The value does not serialize to a JSON object
    #[error("Value is not a JSON object")]
    NotAnObject,

    /// A thread panicked while holding the connection
    #[error("Store connection lock poisoned")]
    Poisoned,
}

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Selects documents in a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Id(String),
    /// Top-level field equals the given JSON value.
    Eq(String, Value),
}

impl Filter {
    pub fn id(id: impl Into<String>) -> Self {
        Filter::Id(id.into())
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => document.get("id").and_then(Value::as_str) == Some(id.as_str()),
            Filter::Eq(field, value) => document.get(field) == Some(value),
        }
    }
}

/// The operations the catalog needs from a document database.
pub trait DocumentStore: Send + Sync {
    fn insert_one(&self, collection: &str, document: &Document) -> Result<()>;

    /// Zero or more documents, in insertion order.
    fn find(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>>;

    fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Document>> {
        Ok(self.find(collection, filter)?.into_iter().next())
    }

    /// Overlays `set` onto the first matching document. An `id` key in `set` is ignored.
    /// Returns whether a document matched.
    fn update_one(&self, collection: &str, filter: &Filter, set: &Document) -> Result<bool>;

    /// Swaps the body of the first matching document, keeping its id.
    fn replace_one(&self, collection: &str, filter: &Filter, document: &Document)
        -> Result<bool>;

    fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool>;
}

pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn filter_matching() {
        let d = doc(json!({ "id": "a1", "author": "x", "readMins": 3 }));
        assert!(Filter::All.matches(&d));
        assert!(Filter::id("a1").matches(&d));
        assert!(!Filter::id("a2").matches(&d));
        assert!(Filter::eq("author", "x").matches(&d));
        assert!(Filter::eq("readMins", 3).matches(&d));
        assert!(!Filter::eq("readMins", "3").matches(&d));
        assert!(!Filter::eq("missing", Value::Null).matches(&d));
    }

    #[test]
    fn to_document_rejects_scalars() {
        assert!(matches!(to_document(&5), Err(StoreError::NotAnObject)));
    }
}
