use crate::model::source::Source;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// A catalog article as persisted in the `articles` collection.
///
/// Instances are only built from documents that already passed article validation,
/// so the field types here are the narrow, validated ones. Dates stay in their
/// `MM/DD/YYYY` wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Canonical 36-character UUID.
    pub id: String,
    pub title: String,
    /// Id of the owning author. The author keeps a back-reference to this article.
    pub author: String,
    pub modified_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(deserialize_with = "whole_read_mins")]
    pub read_mins: i64,
    pub source: Source,
}

/// How a JSON number reads as a whole `i64`. Integral floats such as `5.0` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WholeNumber {
    Fits(i64),
    OutOfRange,
    Fractional,
}

impl WholeNumber {
    pub fn of(number: &Number) -> Self {
        if let Some(n) = number.as_i64() {
            return WholeNumber::Fits(n);
        }
        if number.is_u64() {
            return WholeNumber::OutOfRange;
        }
        match number.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 => {
                // 2^63 is exactly representable; everything below it fits.
                if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    WholeNumber::Fits(f as i64)
                } else {
                    WholeNumber::OutOfRange
                }
            }
            _ => WholeNumber::Fractional,
        }
    }
}

fn whole_read_mins<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    match WholeNumber::of(&number) {
        WholeNumber::Fits(n) => Ok(n),
        _ => Err(D::Error::custom(format!(
            "readMins must be a whole number that fits in 64 bits, got {}",
            number
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn uses_camel_case_wire_names() {
        let article = Article {
            id: "9b2e6c1e-6a8f-4a57-9d43-2f0f7bb7a1c4".to_string(),
            title: "Ownership in practice".to_string(),
            author: "0d4b3c55-5f7e-4d4e-b0b6-1b8f3c9a2e10".to_string(),
            modified_at: "01/15/2020".to_string(),
            published_at: None,
            url: None,
            keywords: Some(vec!["rust".to_string()]),
            read_mins: 7,
            source: Source::Blog,
        };

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["modifiedAt"], json!("01/15/2020"));
        assert_eq!(value["readMins"], json!(7));
        assert!(value.get("publishedAt").is_none());
    }

    #[test]
    fn null_optionals_decode_as_none() {
        let article: Article = serde_json::from_value(json!({
            "id": "9b2e6c1e-6a8f-4a57-9d43-2f0f7bb7a1c4",
            "title": "t",
            "author": "0d4b3c55-5f7e-4d4e-b0b6-1b8f3c9a2e10",
            "modifiedAt": "01/15/2020",
            "url": null,
            "keywords": null,
            "readMins": 3,
            "source": "TWEET"
        }))
        .unwrap();
        assert_eq!(article.url, None);
        assert_eq!(article.keywords, None);
    }

    #[test]
    fn whole_floats_decode_as_integers() {
        let mut body = json!({
            "id": "9b2e6c1e-6a8f-4a57-9d43-2f0f7bb7a1c4",
            "title": "t",
            "author": "0d4b3c55-5f7e-4d4e-b0b6-1b8f3c9a2e10",
            "modifiedAt": "01/15/2020",
            "readMins": 5.0,
            "source": "BLOG"
        });
        let article: Article = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(article.read_mins, 5);
        assert_eq!(serde_json::to_value(&article).unwrap()["readMins"], json!(5));

        body["readMins"] = json!(2.5);
        assert!(serde_json::from_value::<Article>(body.clone()).is_err());
        body["readMins"] = json!(u64::MAX);
        assert!(serde_json::from_value::<Article>(body).is_err());
    }

    #[test]
    fn whole_number_classification() {
        let of = |v: serde_json::Value| WholeNumber::of(v.as_number().unwrap());
        assert_eq!(of(json!(7)), WholeNumber::Fits(7));
        assert_eq!(of(json!(-3)), WholeNumber::Fits(-3));
        assert_eq!(of(json!(12.0)), WholeNumber::Fits(12));
        assert_eq!(of(json!(0.5)), WholeNumber::Fractional);
        assert_eq!(of(json!(u64::MAX)), WholeNumber::OutOfRange);
        assert_eq!(of(json!(1e300)), WholeNumber::OutOfRange);
    }
}
