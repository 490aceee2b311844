use crate::store::{self, DocumentStore, Filter, Result};
use common::model::article::Article;
use common::model::document::Document;
use std::sync::Arc;

pub const COLLECTION: &str = "articles";

/// CRUD on the `articles` collection. No validation, no integrity upkeep.
#[derive(Clone)]
pub struct ArticleRepository {
    store: Arc<dyn DocumentStore>,
}

impl ArticleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        ArticleRepository { store }
    }

    pub fn insert(&self, article: &Article) -> Result<()> {
        self.store.insert_one(COLLECTION, &store::to_document(article)?)
    }

    pub fn find_all(&self) -> Result<Vec<Article>> {
        self.find(&Filter::All)
    }

    /// `None` when no article has this id.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Article>> {
        self.store
            .find_one(COLLECTION, &Filter::id(id))?
            .map(store::from_document)
            .transpose()
    }

    pub fn find_by_author(&self, author_id: &str) -> Result<Vec<Article>> {
        self.find(&Filter::eq("author", author_id))
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Article>> {
        self.store
            .find(COLLECTION, filter)?
            .into_iter()
            .map(store::from_document)
            .collect()
    }

    pub fn replace(&self, id: &str, article: &Article) -> Result<bool> {
        self.store
            .replace_one(COLLECTION, &Filter::id(id), &store::to_document(article)?)
    }

    /// Writes only the supplied fields.
    pub fn merge(&self, id: &str, patch: &Document) -> Result<bool> {
        self.store.update_one(COLLECTION, &Filter::id(id), patch)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete_one(COLLECTION, &Filter::id(id))
    }
}

/// The record a merge would produce: patch fields win, the rest is kept.
pub fn merge_preview(stored: &Document, patch: &Document) -> Document {
    let mut merged = stored.clone();
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
