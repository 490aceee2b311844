use crate::catalog::coordinator::Catalog;
use crate::error::Result;
use log::warn;
use serde::Serialize;
use std::collections::HashMap;

/// One place where articles and authors disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// The article's author exists but does not list the article.
    MissingBackReference { article_id: String, author_id: String },
    /// The article names an author that does not exist.
    DanglingAuthor { article_id: String, author_id: String },
    /// The author lists an article that does not exist.
    DanglingReference { author_id: String, article_id: String },
    /// The author lists an article that names someone else.
    MismatchedOwner {
        author_id: String,
        article_id: String,
        owner_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub articles: usize,
    pub authors: usize,
    pub issues: Vec<IntegrityIssue>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

impl Catalog {
    /// Checks the author/article relationship in both directions. Read-only.
    pub fn audit(&self) -> Result<AuditReport> {
        let articles = self.articles.find_all()?;
        let authors = self.authors.find_all()?;

        let owner_of: HashMap<&str, &str> = articles
            .iter()
            .map(|a| (a.id.as_str(), a.author.as_str()))
            .collect();
        let by_id: HashMap<&str, _> = authors.iter().map(|a| (a.id.as_str(), a)).collect();

        let mut issues = Vec::new();
        for article in &articles {
            match by_id.get(article.author.as_str()) {
                None => issues.push(IntegrityIssue::DanglingAuthor {
                    article_id: article.id.clone(),
                    author_id: article.author.clone(),
                }),
                Some(author) if !author.references(&article.id) => {
                    issues.push(IntegrityIssue::MissingBackReference {
                        article_id: article.id.clone(),
                        author_id: author.id.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        for author in &authors {
            for article_id in &author.articles {
                match owner_of.get(article_id.as_str()) {
                    None => issues.push(IntegrityIssue::DanglingReference {
                        author_id: author.id.clone(),
                        article_id: article_id.clone(),
                    }),
                    Some(owner) if *owner != author.id => {
                        issues.push(IntegrityIssue::MismatchedOwner {
                            author_id: author.id.clone(),
                            article_id: article_id.clone(),
                            owner_id: owner.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        for issue in &issues {
            warn!("Integrity issue: {:?}", issue);
        }
        Ok(AuditReport {
            articles: articles.len(),
            authors: authors.len(),
            issues,
        })
    }
}
