//! Record normalization
//!
//! Chart values arrive in several historical shapes. The helpers here reduce
//! them to canonical scalars or single-line text. None of them fail: every
//! input, including `null` and malformed embedded JSON, has a best-effort
//! textual result.
//!
//! - [`vitals`] - vitals in object / array / string form to [`NormalizedVitals`]
//! - [`dates`] - `DDMMYYYY` / `HHMMSS` rendering of loosely formatted dates

pub mod dates;
pub mod vitals;

pub use dates::{format_date, format_time, parse_datetime};
pub use vitals::{normalize_vitals, NormalizedVitals, VitalsInput};

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(\.\d+)?").expect("number pattern is valid"));

/// Envelope keys that may wrap a collection
const ARRAY_ENVELOPE_KEYS: &[&str] = &["records", "items", "data", "results"];

/// Renders a JSON value as plain text
///
/// Strings are returned as-is, numbers and booleans in their literal form,
/// objects and arrays as compact JSON and `null` as the empty string.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Collapses all whitespace runs to single spaces and trims
pub fn condense(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses JSON embedded in a string, `None` for malformed input or `null`
pub fn safe_json_parse(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text.trim())
        .ok()
        .filter(|value| !value.is_null())
}

/// Extracts the first signed decimal number from a value
///
/// JSON numbers are returned directly; everything else is stringified and
/// searched for `-?\d+(\.\d+)?`. Returns `None` when nothing matches, in
/// which case callers fall back to the raw text.
///
/// # Examples
///
/// ```
/// use bdt_export::core::normalize::parse_numeric;
/// use serde_json::json;
///
/// assert_eq!(parse_numeric(&json!("72 bpm")), Some(72.0));
/// assert_eq!(parse_numeric(&json!(-3.5)), Some(-3.5));
/// assert_eq!(parse_numeric(&json!("n/a")), None);
/// ```
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Number(n) => n.as_f64(),
        other => parse_numeric_str(&value_text(other)),
    }
}

/// String form of [`parse_numeric`]
pub fn parse_numeric_str(text: &str) -> Option<f64> {
    NUMBER_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Renders a parsed number the way it was most likely written
///
/// Integral values carry no fractional part (`120`, not `120.0`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Turns a field key into a display label
///
/// `heart_rate` and `heartRate` both become `Heart rate` / `Heart Rate`:
/// underscores become spaces, lower/digit→upper transitions are split,
/// whitespace is collapsed and the first letter capitalised.
pub fn humanize_label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut previous: Option<char> = None;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if let Some(p) = previous {
            if (p.is_lowercase() || p.is_ascii_digit()) && c.is_uppercase() {
                spaced.push(' ');
            }
        }
        spaced.push(c);
        previous = Some(c);
    }

    let condensed = condense(&spaced);
    let mut chars = condensed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Flattens structured narrative data into one line
///
/// Used for review-of-systems and physical-exam blocks:
/// - objects become `Label: value; Label: value`, skipping empty values and
///   rendering nested objects as compact JSON
/// - arrays become their entries joined with `"; "`
/// - strings are condensed
///
/// # Examples
///
/// ```
/// use bdt_export::core::normalize::format_key_value_pairs;
/// use serde_json::json;
///
/// let text = format_key_value_pairs(&json!({"heartSounds": "regular", "lungs": "clear"}));
/// assert_eq!(text, "Heart Sounds: regular; Lungs: clear");
/// ```
pub fn format_key_value_pairs(data: &Value) -> String {
    match data {
        Value::Null | Value::Bool(false) => String::new(),
        Value::String(s) => condense(s),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| condense(&value_text(entry)))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::Array(items) => items
                        .iter()
                        .map(value_text)
                        .filter(|t| !t.trim().is_empty())
                        .collect::<Vec<_>>()
                        .join(", "),
                    other => value_text(other),
                };
                let text = condense(&text);
                if text.is_empty() {
                    None
                } else {
                    Some(format!("{}: {}", humanize_label(key), text))
                }
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => condense(&value_text(other)),
    }
}

/// Picks the first candidate that is, or wraps, an array
///
/// Candidates are tried in priority order. A candidate matches when it is an
/// array, a string holding a JSON array, or an object envelope with a
/// `records`, `items`, `data` or `results` array. Returns an empty list when
/// nothing matches.
pub fn resolve_array(candidates: &[Option<&Value>]) -> Vec<Value> {
    for candidate in candidates.iter().flatten() {
        match candidate {
            Value::Array(items) => return items.clone(),
            Value::String(text) => {
                if let Some(Value::Array(items)) = safe_json_parse(text) {
                    return items;
                }
            }
            Value::Object(map) => {
                let envelope = ARRAY_ENVELOPE_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_array));
                if let Some(items) = envelope {
                    return items.clone();
                }
            }
            _ => {}
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!("abc")), "abc");
        assert_eq!(value_text(&json!(72)), "72");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_parse_numeric_variants() {
        assert_eq!(parse_numeric(&json!(98.6)), Some(98.6));
        assert_eq!(parse_numeric(&json!("approx 37.2 C")), Some(37.2));
        assert_eq!(parse_numeric(&json!("-4")), Some(-4.0));
        assert_eq!(parse_numeric(&json!("none")), None);
        assert_eq!(parse_numeric(&json!(null)), None);
        assert_eq!(parse_numeric(&json!({"value": 3})), None);
        assert_eq!(parse_numeric(&json!(true)), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(37.5), "37.5");
        assert_eq!(format_number(-2.0), "-2");
    }

    #[test]
    fn test_humanize_label() {
        assert_eq!(humanize_label("heart_rate"), "Heart rate");
        assert_eq!(humanize_label("painScore"), "Pain Score");
        assert_eq!(humanize_label("bmi2Value"), "Bmi2 Value");
        assert_eq!(humanize_label("  glucose__level "), "Glucose level");
        assert_eq!(humanize_label(""), "");
    }

    #[test]
    fn test_condense() {
        assert_eq!(condense("  a\n\tb   c "), "a b c");
        assert_eq!(condense("   "), "");
    }

    #[test]
    fn test_format_key_value_pairs_object() {
        let data = json!({
            "general": "no  fever\nno chills",
            "skin": "",
            "notes": null,
            "cardio": {"rhythm": "regular"},
            "symptoms": ["cough", "fatigue"]
        });
        assert_eq!(
            format_key_value_pairs(&data),
            r#"General: no fever no chills; Cardio: {"rhythm":"regular"}; Symptoms: cough, fatigue"#
        );
    }

    #[test]
    fn test_format_key_value_pairs_array_and_scalars() {
        assert_eq!(
            format_key_value_pairs(&json!(["clear lungs", {"abdomen": "soft"}, null, ""])),
            r#"clear lungs; {"abdomen":"soft"}"#
        );
        assert_eq!(format_key_value_pairs(&json!("  lots   of space ")), "lots of space");
        assert_eq!(format_key_value_pairs(&json!(null)), "");
    }

    #[test]
    fn test_resolve_array_priority_and_envelopes() {
        let root = json!([{"id": 1}]);
        let nested = json!([{"id": 2}]);
        assert_eq!(
            resolve_array(&[Some(&root), Some(&nested)]),
            vec![json!({"id": 1})]
        );

        assert_eq!(resolve_array(&[None, Some(&nested)]), vec![json!({"id": 2})]);

        let encoded = json!(r#"[{"id": 3}]"#);
        assert_eq!(resolve_array(&[Some(&encoded)]), vec![json!({"id": 3})]);

        let envelope = json!({"results": [{"id": 4}]});
        assert_eq!(resolve_array(&[Some(&envelope)]), vec![json!({"id": 4})]);
    }

    #[test]
    fn test_resolve_array_falls_through_unusable_candidates() {
        let malformed = json!("[not json");
        let scalar = json!(5);
        let fallback = json!([1]);
        assert_eq!(
            resolve_array(&[Some(&malformed), Some(&scalar), Some(&fallback)]),
            vec![json!(1)]
        );
        assert!(resolve_array(&[Some(&json!(null)), None]).is_empty());
    }
}
