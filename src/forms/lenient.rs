//! Field deserializers that never reject a well-formed JSON body.
//!
//! A value of the wrong JSON type is kept (or blanked) so validation reports
//! it against its field, after the submission has been counted by the rate
//! limiter.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::FieldErrors;

pub const WHOLE_NUMBER_MESSAGE: &str = "Please enter a whole number";

/// Strings as-is, numbers and booleans as their text. Anything else is blank.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Like [`text`], with `null`, arrays and objects as `None`.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => Some(value),
        Value::Number(value) => Some(value.to_string()),
        Value::Bool(value) => Some(value.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// A count as submitted: a JSON integer, or a string holding one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WholeNumber {
    #[default]
    Missing,
    Value(i64),
    /// Present but not a whole number, e.g. `"abc"` or `2.5`
    Invalid,
}

impl WholeNumber {
    /// The count as a `u8` within `bounds`, recording a field error otherwise.
    pub(crate) fn within(
        self,
        field: &str,
        bounds: RangeInclusive<u8>,
        out_of_range: &str,
        errors: &mut FieldErrors,
    ) -> Option<u8> {
        let count = match self {
            Self::Value(value) => u8::try_from(value).ok().filter(|v| bounds.contains(v)),
            Self::Missing => None,
            Self::Invalid => {
                errors.add(field, WHOLE_NUMBER_MESSAGE);
                return None;
            }
        };

        if count.is_none() {
            errors.add(field, out_of_range);
        }
        count
    }
}

impl From<i64> for WholeNumber {
    fn from(value: i64) -> Self {
        Self::Value(value)
    }
}

impl<'de> Deserialize<'de> for WholeNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Self::Missing,
            Value::Number(number) => number
                .as_i64()
                .or_else(|| {
                    // 2.0 is a whole number; anything beyond i32 is out of range anyway
                    number
                        .as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX))
                        .map(|f| f as i64)
                })
                .map_or(Self::Invalid, Self::Value),
            Value::String(text) if text.trim().is_empty() => Self::Missing,
            Value::String(text) => text.trim().parse().map_or(Self::Invalid, Self::Value),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => Self::Invalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "text")]
        name: String,
        #[serde(deserialize_with = "optional_text")]
        note: Option<String>,
        count: WholeNumber,
    }

    fn sample(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_counts_accept_integers_and_numeric_strings() {
        assert_eq!(sample(json!({ "count": 2 })).count, WholeNumber::Value(2));
        assert_eq!(sample(json!({ "count": " 2 " })).count, WholeNumber::Value(2));
        assert_eq!(sample(json!({ "count": 3.0 })).count, WholeNumber::Value(3));
        assert_eq!(sample(json!({ "count": -4 })).count, WholeNumber::Value(-4));
    }

    #[test]
    fn test_mistyped_counts_are_kept_as_invalid() {
        for count in [json!("abc"), json!(2.5), json!(true), json!([2]), json!({ "n": 2 })] {
            assert_eq!(sample(json!({ "count": count })).count, WholeNumber::Invalid);
        }

        assert_eq!(sample(json!({})).count, WholeNumber::Missing);
        assert_eq!(sample(json!({ "count": null })).count, WholeNumber::Missing);
        assert_eq!(sample(json!({ "count": "" })).count, WholeNumber::Missing);
    }

    #[test]
    fn test_text_fields_never_reject_the_body() {
        let parsed = sample(json!({ "name": 42, "note": { "nested": true } }));
        assert_eq!(parsed.name, "42");
        assert_eq!(parsed.note, None);

        let parsed = sample(json!({ "name": null, "note": false }));
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.note.as_deref(), Some("false"));
    }

    #[test]
    fn test_within_reports_the_right_message() {
        let mut errors = FieldErrors::default();
        assert_eq!(
            WholeNumber::Value(3).within("guests", 1..=20, "out of range", &mut errors),
            Some(3)
        );
        assert!(errors.is_empty());

        WholeNumber::Invalid.within("a", 1..=20, "out of range", &mut errors);
        WholeNumber::Missing.within("b", 1..=20, "out of range", &mut errors);
        WholeNumber::Value(300).within("c", 1..=20, "out of range", &mut errors);

        assert_eq!(errors.get("a"), Some(WHOLE_NUMBER_MESSAGE));
        assert_eq!(errors.get("b"), Some("out of range"));
        assert_eq!(errors.get("c"), Some("out of range"));
    }
}
