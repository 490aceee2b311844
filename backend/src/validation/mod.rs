//! # Article Validation
//!
//! Articles arrive as raw JSON objects and are checked before they reach the store.
//! Two strategies implement the same `ArticleValidator` contract:
//!
//! - `manual::ManualValidator` walks the structural checks and every field rule,
//!   logs each outcome and reports *all* violations at once.
//! - `declarative::DeclarativeValidator` evaluates a composable `Schema` and stops
//!   at the first violation.
//!
//! Both draw their predicates from `rules` and their limits from an `ArticleRules`
//! value handed over at construction. For well-formed input they accept and reject
//! the same articles. Only the amount of diagnostics differs.
//!
//! Date rules compare against a `Clock`, so an article dated tomorrow fails today
//! and passes tomorrow. That time dependence is intended.

pub mod clock;
pub mod declarative;
pub mod manual;
pub mod rules;

use crate::validation::clock::Clock;
use crate::validation::declarative::DeclarativeValidator;
use crate::validation::manual::ManualValidator;
use crate::validation::rules::ArticleRules;
use common::model::document::Document;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// One broken constraint.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Structural: the field is not part of an article
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// Structural: a required field is absent
    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    /// The request body is not a JSON object at all
    #[error("malformed body: {reason}")]
    Malformed { reason: String },

    /// A field is present but fails its rule
    #[error("{field}: {reason}")]
    Constraint {
        field: String,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
}

impl Violation {
    pub fn constraint(field: &str, reason: impl Into<String>, value: Option<&Value>) -> Self {
        Violation::Constraint {
            field: field.to_string(),
            reason: reason.into(),
            value: value.and_then(safe_value),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Violation::UnknownField { field }
            | Violation::MissingField { field }
            | Violation::Constraint { field, .. } => field,
            Violation::Malformed { .. } => "body",
        }
    }

    pub fn is_structural(&self) -> bool {
        !matches!(self, Violation::Constraint { .. })
    }
}

/// Echo back short scalars only. Long strings and containers stay out of diagnostics.
fn safe_value(value: &Value) -> Option<Value> {
    const MAX_ECHO: usize = 64;
    match value {
        Value::String(s) if s.chars().count() <= MAX_ECHO => Some(value.clone()),
        Value::Number(_) | Value::Bool(_) | Value::Null => Some(value.clone()),
        _ => None,
    }
}

/// Raised when an article fails validation. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        ValidationError { violations }
    }

    pub fn single(violation: Violation) -> Self {
        ValidationError {
            violations: vec![violation],
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(Violation::field).collect()
    }

    pub fn names_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "article failed validation")?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The article validation capability shared by both strategies.
pub trait ArticleValidator: Send + Sync {
    fn name(&self) -> &'static str;

    fn validate(&self, article: &Document) -> Result<(), ValidationError>;
}

/// Which validator the server runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Manual,
    Declarative,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Strategy::Manual),
            "declarative" | "schema" => Ok(Strategy::Declarative),
            other => Err(format!("expected 'manual' or 'declarative', got '{}'", other)),
        }
    }
}

pub fn build(
    strategy: Strategy,
    rules: ArticleRules,
    clock: Arc<dyn Clock>,
) -> Arc<dyn ArticleValidator> {
    match strategy {
        Strategy::Manual => Arc::new(ManualValidator::new(rules, clock)),
        Strategy::Declarative => Arc::new(DeclarativeValidator::new(rules, clock)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::clock::FixedClock;
    use chrono::NaiveDate;
    use serde_json::json;

    fn clock() -> Arc<dyn Clock> {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Arc::new(FixedClock(now))
    }

    fn validators() -> Vec<Arc<dyn ArticleValidator>> {
        vec![
            build(Strategy::Manual, ArticleRules::default(), clock()),
            build(Strategy::Declarative, ArticleRules::default(), clock()),
        ]
    }

    fn valid_article() -> Document {
        json!({
            "id": "9b2e6c1e-6a8f-4a57-9d43-2f0f7bb7a1c4",
            "title": "Borrowing without tears",
            "author": "0d4b3c55-5f7e-4d4e-b0b6-1b8f3c9a2e10",
            "modifiedAt": "01/15/2020",
            "publishedAt": "01/10/2020",
            "url": "https://example.com/posts/borrowing",
            "keywords": ["rust", "borrowck"],
            "readMins": 6,
            "source": "BLOG"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    /// Each entry breaks exactly one field rule.
    fn single_violations() -> Vec<(&'static str, Document)> {
        let with = |field: &str, value: Value| {
            let mut article = valid_article();
            article.insert(field.to_string(), value);
            article
        };
        let without = |field: &str| {
            let mut article = valid_article();
            article.remove(field);
            article
        };

        vec![
            ("id", with("id", json!("1234"))),
            ("id", with("id", json!("                                    "))),
            ("title", with("title", json!("   "))),
            ("title", with("title", json!("x".repeat(256)))),
            ("title", without("title")),
            ("modifiedAt", with("modifiedAt", json!("2020-01-15"))),
            ("modifiedAt", with("modifiedAt", json!("13/01/2020"))),
            ("modifiedAt", with("modifiedAt", json!("06/02/2024"))),
            ("modifiedAt", without("modifiedAt")),
            ("publishedAt", with("publishedAt", json!("1/5/2020"))),
            ("publishedAt", with("publishedAt", json!("12/31/2030"))),
            ("url", with("url", json!("not a url"))),
            ("keywords", with("keywords", json!([]))),
            ("keywords", with("keywords", json!(["a", "b", "c", "d"]))),
            ("keywords", with("keywords", json!(["ok", " "]))),
            ("keywords", with("keywords", json!("rust"))),
            ("readMins", with("readMins", json!(0))),
            ("readMins", with("readMins", json!("5"))),
            ("readMins", with("readMins", json!(2.5))),
            ("source", with("source", json!("PODCAST"))),
            ("source", without("source")),
            ("extra", with("extra", json!(true))),
        ]
    }

    #[test]
    fn both_strategies_accept_valid_articles() {
        let mut minimal = valid_article();
        for optional in ["publishedAt", "url", "keywords"] {
            minimal.remove(optional);
        }

        for validator in validators() {
            assert_eq!(validator.validate(&valid_article()), Ok(()), "{}", validator.name());
            assert_eq!(validator.validate(&minimal), Ok(()), "{}", validator.name());
        }
    }

    #[test]
    fn both_strategies_reject_single_violations() {
        for (field, article) in single_violations() {
            for validator in validators() {
                let err = validator.validate(&article).unwrap_err();
                if validator.name() == "manual" {
                    assert!(err.names_field(field), "manual missed {}: {}", field, err);
                }
            }
        }
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!("Manual".parse::<Strategy>(), Ok(Strategy::Manual));
        assert_eq!("declarative".parse::<Strategy>(), Ok(Strategy::Declarative));
        assert!("joi".parse::<Strategy>().is_err());
    }

    #[test]
    fn long_values_are_not_echoed() {
        let v = Violation::constraint("title", "too long", Some(&json!("x".repeat(300))));
        assert_eq!(
            v,
            Violation::Constraint {
                field: "title".to_string(),
                reason: "too long".to_string(),
                value: None
            }
        );
        let display = ValidationError::new(vec![
            Violation::MissingField { field: "title".into() },
            Violation::UnknownField { field: "extra".into() },
        ])
        .to_string();
        assert_eq!(
            display,
            "article failed validation: required field 'title' is missing; unknown field 'extra'"
        );
    }
}
