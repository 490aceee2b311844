//! Field rules for articles.
//!
//! Every rule has the same shape (`Rule`): it receives the evaluation context, the
//! field name and the field's value as found in the document (`None` when absent),
//! and returns `Ok(())` or the `Violation` it found. Rules never look at other fields.

use crate::validation::Violation;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use common::model::article::WholeNumber;
use common::model::source::Source;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Fields an article may carry.
pub const ALLOWED_FIELDS: [&str; 9] = [
    "id",
    "title",
    "author",
    "modifiedAt",
    "publishedAt",
    "url",
    "keywords",
    "readMins",
    "source",
];

/// Fields an article must carry.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "id",
    "title",
    "author",
    "modifiedAt",
    "readMins",
    "source",
];

/// Limits applied by the field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRules {
    pub id_length: usize,
    pub title_max_length: usize,
    pub author_max_length: usize,
    /// `(min, max)` for `readMins`. See `read_mins` for how they are applied.
    pub read_mins: (i64, i64),
    /// chrono format for `modifiedAt` / `publishedAt`.
    pub date_format: &'static str,
    pub keywords: (usize, usize),
}

impl Default for ArticleRules {
    fn default() -> Self {
        ArticleRules {
            id_length: 36,
            title_max_length: 255,
            author_max_length: 100,
            read_mins: (1, 20),
            date_format: "%m/%d/%Y",
            keywords: (1, 3),
        }
    }
}

/// What a rule gets to see besides the value itself.
pub struct RuleContext<'a> {
    pub rules: &'a ArticleRules,
    pub now: NaiveDateTime,
}

pub type RuleResult = Result<(), Violation>;

pub type Rule = fn(&RuleContext<'_>, &str, Option<&Value>) -> RuleResult;

// `MM/DD/YYYY` with both digits required: chrono alone would take `1/5/2020`.
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("date shape pattern"));

// Optional scheme (any case), optional userinfo, a host (dotted name with TLD or IPv4
// with octets up to 255; bare `localhost` has no TLD and fails), optional port, then
// anything non-blank.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?:(?i:https?|ftp)://)?
        (?:[^\s:@/]+(?::[^\s:@/]*)?@)?
        (?:
            (?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)
          | (?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}
        )
        (?::\d{1,5})?
        (?:[/?\#]\S*)?
        $",
    )
    .expect("url pattern")
});

fn is_absent(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn is_blank_or_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Canonical identifier: a non-blank string of exactly `id_length` characters.
pub fn identifier(ctx: &RuleContext<'_>, field: &str, value: Option<&Value>) -> RuleResult {
    let Some(Value::String(id)) = value else {
        return Err(not_a_string(field, value));
    };

    let mut problems = Vec::new();
    if id.trim().is_empty() {
        problems.push(format!("{} cannot be empty", field));
    }
    if id.chars().count() != ctx.rules.id_length {
        problems.push(format!(
            "{} length is different from {}",
            field, ctx.rules.id_length
        ));
    }
    joined(field, problems, value)
}

pub fn title(ctx: &RuleContext<'_>, field: &str, value: Option<&Value>) -> RuleResult {
    bounded_string(field, value, ctx.rules.title_max_length)
}

/// `author` treated as a plain name rather than an identifier.
pub fn author_name(ctx: &RuleContext<'_>, field: &str, value: Option<&Value>) -> RuleResult {
    bounded_string(field, value, ctx.rules.author_max_length)
}

fn bounded_string(field: &str, value: Option<&Value>, max: usize) -> RuleResult {
    let Some(Value::String(s)) = value else {
        return Err(not_a_string(field, value));
    };

    let mut problems = Vec::new();
    if s.trim().is_empty() {
        problems.push(format!("{} cannot be empty", field));
    }
    if s.chars().count() > max {
        problems.push(format!("{} max length is {}", field, max));
    }
    joined(field, problems, value)
}

/// A required `MM/DD/YYYY` date that is not later than now.
///
/// The date stands for its local midnight, and it fails when `now <= midnight`.
/// Today's date therefore passes for the rest of the day, but not at the stroke of
/// midnight itself.
pub fn past_date(ctx: &RuleContext<'_>, field: &str, value: Option<&Value>) -> RuleResult {
    let Some(Value::String(s)) = value else {
        return Err(not_a_string(field, value));
    };

    let Some(date) = parse_date(s, ctx.rules.date_format) else {
        return Err(Violation::constraint(
            field,
            "invalid date format: use MM/DD/YYYY",
            value,
        ));
    };

    if ctx.now <= date.and_time(NaiveTime::MIN) {
        return Err(Violation::constraint(
            field,
            format!("{} cannot be later than the current date", field),
            value,
        ));
    }
    Ok(())
}

pub fn optional_past_date(
    ctx: &RuleContext<'_>,
    field: &str,
    value: Option<&Value>,
) -> RuleResult {
    if is_blank_or_absent(value) {
        return Ok(());
    }
    past_date(ctx, field, value)
}

pub fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, format).ok()
}

pub fn optional_url(_ctx: &RuleContext<'_>, field: &str, value: Option<&Value>) -> RuleResult {
    if is_blank_or_absent(value) {
        return Ok(());
    }
    match value {
        Some(Value::String(url)) if URL_PATTERN.is_match(url.trim()) => Ok(()),
        Some(Value::String(_)) => Err(Violation::constraint(field, "invalid URL", value)),
        _ => Err(not_a_string(field, value)),
    }
}

/// Absent or `null` keywords pass. Otherwise: a list of 1..=3 non-blank strings.
pub fn optional_keywords(
    ctx: &RuleContext<'_>,
    field: &str,
    value: Option<&Value>,
) -> RuleResult {
    if is_absent(value) {
        return Ok(());
    }
    let Some(Value::Array(keywords)) = value else {
        return Err(Violation::constraint(field, "keywords must be a list", value));
    };

    let (min, max) = ctx.rules.keywords;
    if keywords.len() < min || keywords.len() > max {
        return Err(Violation::constraint(
            field,
            format!("keywords size must be between {} and {}", min, max),
            None,
        ));
    }

    let all_words = keywords
        .iter()
        .all(|k| k.as_str().is_some_and(|s| !s.trim().is_empty()));
    if !all_words {
        return Err(Violation::constraint(
            field,
            "each keyword must be a non-empty string",
            None,
        ));
    }
    Ok(())
}

/// Integer read time.
///
/// Passes when `value >= min || value >= max`, which only ever rejects values below
/// `min`. There is no effective upper bound. Existing data relies on this, so it is
/// kept as is.
pub fn read_mins(ctx: &RuleContext<'_>, field: &str, value: Option<&Value>) -> RuleResult {
    let (min, max) = ctx.rules.read_mins;
    let mins = match value {
        Some(Value::Number(number)) => match WholeNumber::of(number) {
            WholeNumber::Fits(mins) => mins,
            WholeNumber::OutOfRange => {
                return Err(Violation::constraint(field, "number is out of range", value));
            }
            WholeNumber::Fractional => {
                return Err(Violation::constraint(field, "only integers allowed", value));
            }
        },
        _ => return Err(Violation::constraint(field, "only integers allowed", value)),
    };

    if mins >= min || mins >= max {
        Ok(())
    } else {
        Err(Violation::constraint(
            field,
            format!("only numbers between {} and {}", min, max),
            value,
        ))
    }
}

pub fn source(_ctx: &RuleContext<'_>, field: &str, value: Option<&Value>) -> RuleResult {
    match value {
        Some(Value::String(s)) if s.parse::<Source>().is_ok() => Ok(()),
        _ => Err(Violation::constraint(
            field,
            "provided source is not valid",
            value,
        )),
    }
}

fn not_a_string(field: &str, value: Option<&Value>) -> Violation {
    if is_absent(value) {
        Violation::constraint(field, format!("{} cannot be null", field), None)
    } else {
        Violation::constraint(field, format!("{} must be a string", field), value)
    }
}

fn joined(field: &str, problems: Vec<String>, value: Option<&Value>) -> RuleResult {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Violation::constraint(field, problems.join("; "), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(month: u32, day: u32, year: i32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn check(rule: Rule, value: Value) -> RuleResult {
        let rules = ArticleRules::default();
        let ctx = RuleContext {
            rules: &rules,
            now: at(6, 1, 2024, 12),
        };
        rule(&ctx, "field", Some(&value))
    }

    fn reason(result: RuleResult) -> String {
        match result {
            Err(Violation::Constraint { reason, .. }) => reason,
            other => panic!("expected a constraint violation, got {:?}", other),
        }
    }

    #[test]
    fn identifier_reports_every_problem() {
        assert!(check(identifier, json!("9b2e6c1e-6a8f-4a57-9d43-2f0f7bb7a1c4")).is_ok());
        assert_eq!(
            reason(check(identifier, json!(""))),
            "field cannot be empty; field length is different from 36"
        );
        assert!(check(identifier, json!(42)).is_err());
    }

    #[test]
    fn title_bounds() {
        assert!(check(title, json!("a")).is_ok());
        assert!(check(title, json!("t".repeat(255))).is_ok());
        assert!(check(title, json!("t".repeat(256))).is_err());
        assert!(check(title, json!(" \t ")).is_err());
        assert!(check(author_name, json!("a".repeat(101))).is_err());
    }

    #[test]
    fn date_format_is_strict() {
        assert!(check(past_date, json!("01/15/2020")).is_ok());
        assert!(check(past_date, json!("1/15/2020")).is_err());
        assert!(check(past_date, json!("2020-01-15")).is_err());
        assert!(check(past_date, json!("02/30/2020")).is_err());
        assert!(check(past_date, json!("")).is_err());
    }

    #[test]
    fn date_equal_to_now_is_rejected() {
        let rules = ArticleRules::default();
        let midnight = RuleContext {
            rules: &rules,
            now: at(6, 1, 2024, 0),
        };
        let later_that_day = RuleContext {
            rules: &rules,
            now: at(6, 1, 2024, 9),
        };
        let today = json!("06/01/2024");

        assert!(past_date(&midnight, "modifiedAt", Some(&today)).is_err());
        assert!(past_date(&later_that_day, "modifiedAt", Some(&today)).is_ok());
        assert!(past_date(&later_that_day, "modifiedAt", Some(&json!("06/02/2024"))).is_err());
    }

    #[test]
    fn optional_fields_accept_absence() {
        let rules = ArticleRules::default();
        let ctx = RuleContext {
            rules: &rules,
            now: at(6, 1, 2024, 12),
        };
        for rule in [optional_past_date as Rule, optional_url, optional_keywords] {
            assert!(rule(&ctx, "f", None).is_ok());
            assert!(rule(&ctx, "f", Some(&Value::Null)).is_ok());
        }
        assert!(optional_url(&ctx, "url", Some(&json!("  "))).is_ok());
        assert!(past_date(&ctx, "modifiedAt", None).is_err());
    }

    #[test]
    fn urls() {
        for ok in [
            "https://example.com",
            "http://blog.example.co.uk/2020/01/post?id=4#top",
            "example.org/path",
            "ftp://files.example.net:2121/pub",
            "http://192.168.0.1:8080/",
            "HTTP://example.com",
            "Https://255.255.255.255/",
        ] {
            assert!(check(optional_url, json!(ok)).is_ok(), "{}", ok);
        }
        for bad in [
            "not a url",
            "http://",
            "https://localhost",
            "example",
            "http://exa mple.com",
            "http://999.999.999.999/",
            "http://256.1.1.1",
        ] {
            assert!(check(optional_url, json!(bad)).is_err(), "{}", bad);
        }
        assert!(check(optional_url, json!(12)).is_err());
    }

    #[test]
    fn keyword_counts() {
        assert!(check(optional_keywords, json!(["one"])).is_ok());
        assert!(check(optional_keywords, json!(["a", "b", "c"])).is_ok());
        assert!(check(optional_keywords, json!([])).is_err());
        assert!(check(optional_keywords, json!(["a", "b", "c", "d"])).is_err());
        assert!(check(optional_keywords, json!(["a", 2])).is_err());
        assert!(check(optional_keywords, json!({ "a": 1 })).is_err());
    }

    #[test]
    fn read_mins_only_enforces_the_lower_bound() {
        assert!(check(read_mins, json!(1)).is_ok());
        assert!(check(read_mins, json!(20)).is_ok());
        assert!(check(read_mins, json!(500)).is_ok());
        assert!(check(read_mins, json!(0)).is_err());
        assert!(check(read_mins, json!(-3)).is_err());
        assert_eq!(reason(check(read_mins, json!("5"))), "only integers allowed");
        assert_eq!(reason(check(read_mins, json!(1.5))), "only integers allowed");
    }

    #[test]
    fn read_mins_takes_whole_floats_and_flags_overflow() {
        assert!(check(read_mins, json!(5.0)).is_ok());
        assert!(check(read_mins, json!(0.0)).is_err());
        assert_eq!(reason(check(read_mins, json!(u64::MAX))), "number is out of range");
    }

    #[test]
    fn sources() {
        for s in ["ARTICLE", "BLOG", "TWEET", "NEWSPAPER"] {
            assert!(check(source, json!(s)).is_ok());
        }
        assert!(check(source, json!("Blog")).is_err());
        assert!(check(source, json!(1)).is_err());
    }
}
