use crate::validation::clock::Clock;
use crate::validation::rules::{
    self, ArticleRules, Rule, RuleContext, ALLOWED_FIELDS, REQUIRED_FIELDS,
};
use crate::validation::{ArticleValidator, ValidationError, Violation};
use common::model::document::Document;
use log::{info, warn};
use std::sync::Arc;

/// Field rules in evaluation order. `author` is checked as a bounded name here.
const FIELD_RULES: [(&str, Rule); 9] = [
    ("id", rules::identifier),
    ("title", rules::title),
    ("author", rules::author_name),
    ("modifiedAt", rules::past_date),
    ("publishedAt", rules::optional_past_date),
    ("url", rules::optional_url),
    ("keywords", rules::optional_keywords),
    ("readMins", rules::read_mins),
    ("source", rules::source),
];

/// Rule-by-rule validator that reports every violation.
///
/// Structure is checked first (unknown fields, missing required fields), then every
/// field rule runs regardless of earlier failures. Each outcome is logged.
pub struct ManualValidator {
    rules: ArticleRules,
    clock: Arc<dyn Clock>,
}

impl ManualValidator {
    pub fn new(rules: ArticleRules, clock: Arc<dyn Clock>) -> Self {
        ManualValidator { rules, clock }
    }

    fn check_structure(&self, article: &Document) -> Vec<Violation> {
        let unknown = article
            .keys()
            .filter(|key| !ALLOWED_FIELDS.contains(&key.as_str()))
            .map(|key| Violation::UnknownField { field: key.clone() });
        let missing = REQUIRED_FIELDS
            .iter()
            .filter(|field| !article.contains_key(**field))
            .map(|field| Violation::MissingField {
                field: field.to_string(),
            });
        let violations: Vec<Violation> = unknown.chain(missing).collect();

        if violations.is_empty() {
            info!("- Fields: OK");
        }
        for violation in &violations {
            warn!("- Fields: {}", violation);
        }
        violations
    }
}

impl ArticleValidator for ManualValidator {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn validate(&self, article: &Document) -> Result<(), ValidationError> {
        info!("Validating article structure");
        let mut violations = self.check_structure(article);

        let ctx = RuleContext {
            rules: &self.rules,
            now: self.clock.now(),
        };
        for (field, rule) in FIELD_RULES {
            match rule(&ctx, field, article.get(field)) {
                Ok(()) => info!("- {}: OK", field),
                Err(violation) => {
                    warn!("- {}", violation);
                    // Absent required fields were already reported by the structure check.
                    if article.contains_key(field) || !REQUIRED_FIELDS.contains(&field) {
                        violations.push(violation);
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}
