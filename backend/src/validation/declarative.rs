use crate::validation::clock::Clock;
use crate::validation::rules::{self, ArticleRules, Rule, RuleContext};
use crate::validation::{ArticleValidator, ValidationError, Violation};
use common::model::document::Document;
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// One key of an object schema.
#[derive(Clone)]
pub struct FieldSchema {
    pub name: &'static str,
    pub presence: Presence,
    pub rule: Rule,
}

/// An object schema: a closed set of keys, each with a presence flag and a rule.
///
/// `check` reports the first problem only. Unknown keys are looked at before any
/// declared field, then fields are visited in declaration order.
#[derive(Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn object() -> Self {
        Schema::default()
    }

    pub fn required(mut self, name: &'static str, rule: Rule) -> Self {
        self.fields.push(FieldSchema {
            name,
            presence: Presence::Required,
            rule,
        });
        self
    }

    pub fn optional(mut self, name: &'static str, rule: Rule) -> Self {
        self.fields.push(FieldSchema {
            name,
            presence: Presence::Optional,
            rule,
        });
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    pub fn check(&self, document: &Document, ctx: &RuleContext<'_>) -> Result<(), Violation> {
        if let Some(unknown) = document
            .keys()
            .find(|key| !self.fields.iter().any(|f| f.name == key.as_str()))
        {
            return Err(Violation::UnknownField {
                field: unknown.clone(),
            });
        }

        for field in &self.fields {
            let value = document.get(field.name);
            if value.is_none() {
                match field.presence {
                    Presence::Required => {
                        return Err(Violation::MissingField {
                            field: field.name.to_string(),
                        })
                    }
                    Presence::Optional => continue,
                }
            }
            (field.rule)(ctx, field.name, value)?;
        }
        Ok(())
    }
}

/// The article schema. `author` must look like a canonical identifier here.
pub fn article_schema() -> Schema {
    Schema::object()
        .required("id", rules::identifier)
        .required("title", rules::title)
        .required("author", rules::identifier)
        .required("modifiedAt", rules::past_date)
        .optional("publishedAt", rules::optional_past_date)
        .optional("url", rules::optional_url)
        .optional("keywords", rules::optional_keywords)
        .required("readMins", rules::read_mins)
        .required("source", rules::source)
}

/// Schema-driven validator that stops at the first violation.
pub struct DeclarativeValidator {
    schema: Schema,
    rules: ArticleRules,
    clock: Arc<dyn Clock>,
}

impl DeclarativeValidator {
    pub fn new(rules: ArticleRules, clock: Arc<dyn Clock>) -> Self {
        Self::with_schema(article_schema(), rules, clock)
    }

    pub fn with_schema(schema: Schema, rules: ArticleRules, clock: Arc<dyn Clock>) -> Self {
        DeclarativeValidator {
            schema,
            rules,
            clock,
        }
    }
}

impl ArticleValidator for DeclarativeValidator {
    fn name(&self) -> &'static str {
        "declarative"
    }

    fn validate(&self, article: &Document) -> Result<(), ValidationError> {
        let ctx = RuleContext {
            rules: &self.rules,
            now: self.clock.now(),
        };
        match self.schema.check(article, &ctx) {
            Ok(()) => {
                debug!("Article passed schema validation");
                Ok(())
            }
            Err(violation) => {
                warn!("Schema validation failed: {}", violation);
                Err(ValidationError::single(violation))
            }
        }
    }
}
