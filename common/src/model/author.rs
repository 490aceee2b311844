use crate::model::document::Document;
use serde::{Deserialize, Serialize};

/// An author record from the `authors` collection.
///
/// Apart from `id` and `articles`, authors are free-form: whatever attributes the
/// client sent are kept in `attributes` and flattened back into the JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    /// Ids of the articles written by this author.
    ///
    /// This is a derived index. The article's `author` field is the source of truth,
    /// and only the catalog coordinator writes to this list.
    #[serde(default)]
    pub articles: Vec<String>,
    #[serde(flatten)]
    pub attributes: Document,
}

impl Author {
    pub fn new(id: String, attributes: Document) -> Self {
        Author {
            id,
            articles: Vec::new(),
            attributes,
        }
    }

    pub fn references(&self, article_id: &str) -> bool {
        self.articles.iter().any(|id| id == article_id)
    }
}
