use crate::store::{self, DocumentStore, Filter, Result};
use common::model::author::Author;
use common::model::document::Document;
use log::debug;
use serde_json::Value;
use std::sync::Arc;

pub const COLLECTION: &str = "authors";

/// Keys clients may not write on an author: the id and the back-reference list.
const RESERVED: [&str; 2] = ["id", "articles"];

/// CRUD on the `authors` collection, plus the set operations on the `articles`
/// back-reference list.
#[derive(Clone)]
pub struct AuthorRepository {
    store: Arc<dyn DocumentStore>,
}

impl AuthorRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        AuthorRepository { store }
    }

    pub fn insert(&self, author: &Author) -> Result<()> {
        self.store.insert_one(COLLECTION, &store::to_document(author)?)
    }

    pub fn find_all(&self) -> Result<Vec<Author>> {
        self.store
            .find(COLLECTION, &Filter::All)?
            .into_iter()
            .map(store::from_document)
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Author>> {
        self.store
            .find_one(COLLECTION, &Filter::id(id))?
            .map(store::from_document)
            .transpose()
    }

    /// Replaces the free-form attributes. `id` and `articles` are kept.
    pub fn replace(&self, id: &str, values: &Document) -> Result<Option<Author>> {
        let Some(current) = self.find_by_id(id)? else {
            return Ok(None);
        };

        let updated = Author {
            id: current.id,
            articles: current.articles,
            attributes: attributes(values),
        };
        self.store
            .replace_one(COLLECTION, &Filter::id(id), &store::to_document(&updated)?)?;
        Ok(Some(updated))
    }

    /// Overlays the supplied attributes. `id` and `articles` are kept.
    pub fn merge(&self, id: &str, values: &Document) -> Result<Option<Author>> {
        if !self
            .store
            .update_one(COLLECTION, &Filter::id(id), &attributes(values))?
        {
            return Ok(None);
        }
        self.find_by_id(id)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete_one(COLLECTION, &Filter::id(id))
    }

    /// Set-add. Returns `false` only when the author does not exist.
    pub fn add_article_ref(&self, author_id: &str, article_id: &str) -> Result<bool> {
        let Some(mut author) = self.find_by_id(author_id)? else {
            return Ok(false);
        };
        if !author.references(article_id) {
            author.articles.push(article_id.to_string());
            self.write_refs(&author)?;
        }
        Ok(true)
    }

    /// Set-remove. Returns `false` only when the author does not exist.
    pub fn remove_article_ref(&self, author_id: &str, article_id: &str) -> Result<bool> {
        let Some(mut author) = self.find_by_id(author_id)? else {
            return Ok(false);
        };
        if author.references(article_id) {
            author.articles.retain(|id| id != article_id);
            self.write_refs(&author)?;
        }
        Ok(true)
    }

    fn write_refs(&self, author: &Author) -> Result<()> {
        let mut set = Document::new();
        set.insert(
            "articles".to_string(),
            Value::from(author.articles.clone()),
        );
        self.store
            .update_one(COLLECTION, &Filter::id(&author.id), &set)?;
        Ok(())
    }
}

/// Client-writable part of an author body.
pub fn attributes(values: &Document) -> Document {
    let mut attributes = values.clone();
    for key in RESERVED {
        if attributes.remove(key).is_some() {
            debug!("Ignoring reserved author field '{}'", key);
        }
    }
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use serde_json::json;

    fn repo() -> AuthorRepository {
        AuthorRepository::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn seeded() -> AuthorRepository {
        let repo = repo();
        repo.insert(&Author::new("au1".into(), doc(json!({ "name": "Ada", "bio": "math" }))))
            .unwrap();
        repo
    }

    #[test]
    fn refs_behave_as_a_set() {
        let repo = seeded();
        assert!(repo.add_article_ref("au1", "a1").unwrap());
        assert!(repo.add_article_ref("au1", "a1").unwrap());
        assert!(repo.add_article_ref("au1", "a2").unwrap());
        assert_eq!(repo.find_by_id("au1").unwrap().unwrap().articles, vec!["a1", "a2"]);

        assert!(repo.remove_article_ref("au1", "a1").unwrap());
        assert!(repo.remove_article_ref("au1", "a1").unwrap());
        assert_eq!(repo.find_by_id("au1").unwrap().unwrap().articles, vec!["a2"]);

        assert!(!repo.add_article_ref("ghost", "a1").unwrap());
        assert!(!repo.remove_article_ref("ghost", "a1").unwrap());
    }

    #[test]
    fn replace_keeps_id_and_refs() {
        let repo = seeded();
        repo.add_article_ref("au1", "a1").unwrap();

        let updated = repo
            .replace(
                "au1",
                &doc(json!({ "id": "hijack", "articles": [], "name": "Ada L." })),
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, "au1");
        assert_eq!(updated.articles, vec!["a1"]);
        assert_eq!(updated.attributes, doc(json!({ "name": "Ada L." })));
        assert_eq!(repo.find_by_id("au1").unwrap(), Some(updated));
        assert_eq!(repo.replace("ghost", &Document::new()).unwrap(), None);
    }

    #[test]
    fn merge_overlays_attributes() {
        let repo = seeded();
        let merged = repo
            .merge("au1", &doc(json!({ "bio": "engines", "articles": ["x"] })))
            .unwrap()
            .unwrap();
        assert_eq!(merged.attributes, doc(json!({ "name": "Ada", "bio": "engines" })));
        assert!(merged.articles.is_empty());
        assert_eq!(repo.merge("ghost", &Document::new()).unwrap(), None);
    }

    #[test]
    fn delete_and_list() {
        let repo = seeded();
        repo.insert(&Author::new("au2".into(), Document::new())).unwrap();
        assert_eq!(repo.find_all().unwrap().len(), 2);
        assert!(repo.delete("au1").unwrap());
        assert!(!repo.delete("au1").unwrap());
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }
}
