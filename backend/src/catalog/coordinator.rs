//! # Integrity Coordinator
//!
//! `Catalog` is the one place that writes both collections. It orders repository
//! calls so that, when every call succeeds:
//!
//! - no article is written whose `author` does not exist at that moment, and
//! - each author's `articles` list holds exactly the ids of the articles naming it.
//!
//! Nothing is transactional. If a later step of a sequence fails, the earlier
//! steps stay applied and the two sides can disagree until someone fixes the data.
//! Two requests on the same author can also interleave and lose a back-reference
//! update. `Catalog::audit` reports such gaps. The create path validates before
//! it writes anything so that a rejected article never leaves a reference behind.

use crate::catalog::articles::{self, ArticleRepository};
use crate::catalog::authors::{self, AuthorRepository};
use crate::error::{CatalogError, Result};
use crate::ids;
use crate::store::{self, DocumentStore, StoreError};
use crate::validation::{ArticleValidator, ValidationError, Violation};
use common::model::article::Article;
use common::model::author::Author;
use common::model::document::Document;
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;

pub struct Catalog {
    pub(super) articles: ArticleRepository,
    pub(super) authors: AuthorRepository,
    validator: Arc<dyn ArticleValidator>,
}

impl Catalog {
    pub fn new(store: Arc<dyn DocumentStore>, validator: Arc<dyn ArticleValidator>) -> Self {
        Catalog {
            articles: ArticleRepository::new(store.clone()),
            authors: AuthorRepository::new(store),
            validator,
        }
    }

    pub fn validator_name(&self) -> &'static str {
        self.validator.name()
    }

    // ---- articles ----

    pub fn list_articles(&self) -> Result<Vec<Article>> {
        Ok(self.articles.find_all()?)
    }

    pub fn get_article(&self, id: &str) -> Result<Article> {
        self.articles
            .find_by_id(id)?
            .ok_or_else(|| CatalogError::article_not_found(id))
    }

    /// Creates an article.
    ///
    /// A supplied canonical `id` is kept, anything else is replaced by a fresh one. An
    /// unknown author fails before validation runs.
    pub fn create_article(&self, body: Document) -> Result<Article> {
        let mut document = body;
        let id = ids::resolve(document.get("id"));
        document.insert("id".to_string(), Value::String(id.clone()));

        if let Some(author_id) = document.get("author").and_then(Value::as_str) {
            self.require_author(author_id)?;
        }
        self.validator.validate(&document)?;

        if self.articles.find_by_id(&id)?.is_some() {
            return Err(duplicate_id(&id));
        }

        let article: Article = store::from_document(document)?;
        match self.articles.insert(&article) {
            Err(StoreError::DuplicateId(_)) => return Err(duplicate_id(&id)),
            other => other?,
        }
        self.link(&article.author, &article.id)?;

        info!("Created article {} by author {}", article.id, article.author);
        Ok(article)
    }

    /// Full replace. Every required field must be present again.
    pub fn replace_article(&self, id: &str, body: Document) -> Result<Article> {
        let stored = self.get_article(id)?;

        let mut document = body;
        document.insert("id".to_string(), Value::String(id.to_string()));

        if let Some(author_id) = document.get("author").and_then(Value::as_str) {
            if author_id != stored.author {
                self.require_author(author_id)?;
            }
        }
        self.validator.validate(&document)?;

        let article: Article = store::from_document(document)?;
        if !self.articles.replace(id, &article)? {
            return Err(CatalogError::article_not_found(id));
        }
        self.move_reference(&article.id, &stored.author, &article.author)?;

        info!("Replaced article {}", id);
        Ok(article)
    }

    /// Partial update: the patch is laid over the stored record and the result is
    /// validated, but only the patch fields are written. The author is looked up
    /// only when the patch names one.
    pub fn merge_article(&self, id: &str, patch: Document) -> Result<Article> {
        let stored = self.get_article(id)?;

        let mut patch = patch;
        patch.remove("id");

        let merged = articles::merge_preview(&store::to_document(&stored)?, &patch);
        if let Some(author_id) = patch.get("author").and_then(Value::as_str) {
            self.require_author(author_id)?;
        }
        self.validator.validate(&merged)?;

        let article: Article = store::from_document(merged)?;
        if !self.articles.merge(id, &patch)? {
            return Err(CatalogError::article_not_found(id));
        }
        self.move_reference(&article.id, &stored.author, &article.author)?;

        info!("Merged {} field(s) into article {}", patch.len(), id);
        Ok(article)
    }

    pub fn delete_article(&self, id: &str) -> Result<Article> {
        let stored = self.get_article(id)?;

        if !self.authors.remove_article_ref(&stored.author, id)? {
            warn!(
                "Author {} of article {} no longer exists; nothing to unlink",
                stored.author, id
            );
        }
        self.articles.delete(id)?;

        info!("Deleted article {}", id);
        Ok(stored)
    }

    // ---- authors ----

    pub fn list_authors(&self) -> Result<Vec<Author>> {
        Ok(self.authors.find_all()?)
    }

    pub fn get_author(&self, id: &str) -> Result<Author> {
        self.authors
            .find_by_id(id)?
            .ok_or_else(|| CatalogError::author_not_found(id))
    }

    /// Articles naming this author, read from the article side.
    pub fn articles_by_author(&self, author_id: &str) -> Result<Vec<Article>> {
        self.get_author(author_id)?;
        Ok(self.articles.find_by_author(author_id)?)
    }

    /// Creates an author with a fresh id and no articles.
    pub fn create_author(&self, body: Document) -> Result<Author> {
        let author = Author::new(ids::generate(), authors::attributes(&body));
        self.authors.insert(&author)?;

        info!("Created author {}", author.id);
        Ok(author)
    }

    pub fn replace_author(&self, id: &str, body: Document) -> Result<Author> {
        self.authors
            .replace(id, &body)?
            .ok_or_else(|| CatalogError::author_not_found(id))
    }

    pub fn merge_author(&self, id: &str, body: Document) -> Result<Author> {
        self.authors
            .merge(id, &body)?
            .ok_or_else(|| CatalogError::author_not_found(id))
    }

    /// Deletes the author and every article it lists.
    pub fn delete_author(&self, id: &str) -> Result<Author> {
        let author = self.get_author(id)?;

        for article_id in &author.articles {
            if !self.articles.delete(article_id)? {
                warn!(
                    "Author {} listed article {} which does not exist",
                    id, article_id
                );
            }
        }
        self.authors.delete(id)?;

        info!(
            "Deleted author {} and {} article(s)",
            id,
            author.articles.len()
        );
        Ok(author)
    }

    // ---- integrity helpers ----

    fn require_author(&self, author_id: &str) -> Result<Author> {
        self.authors
            .find_by_id(author_id)?
            .ok_or_else(|| CatalogError::ReferenceNotFound {
                field: "author",
                id: author_id.to_string(),
            })
    }

    fn link(&self, author_id: &str, article_id: &str) -> Result<()> {
        if !self.authors.add_article_ref(author_id, article_id)? {
            warn!(
                "Author {} vanished before article {} could be linked",
                author_id, article_id
            );
        }
        Ok(())
    }

    fn move_reference(&self, article_id: &str, from: &str, to: &str) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if !self.authors.remove_article_ref(from, article_id)? {
            warn!(
                "Previous author {} of article {} no longer exists",
                from, article_id
            );
        }
        self.link(to, article_id)
    }
}

fn duplicate_id(id: &str) -> CatalogError {
    ValidationError::single(Violation::constraint(
        "id",
        "an article with this id already exists",
        Some(&Value::String(id.to_string())),
    ))
    .into()
}
