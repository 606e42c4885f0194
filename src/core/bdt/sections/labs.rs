//! Laboratory orders

use super::{date_field, text_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::core::normalize::{format_date, safe_json_parse, value_text};
use crate::domain::chart::is_blank;
use crate::domain::Record;
use serde_json::Value;

const NAME_KEYS: &[&str] = &["testName", "test_name", "analyte", "name", "test"];
const DETAIL_KEYS: &[&str] = &["resultDetails", "result_details", "result_json"];
const DETAIL_LABEL_KEYS: &[&str] = &["label", "name", "key"];
const DETAIL_REFERENCE_KEYS: &[&str] = &["referenceRange", "reference", "reference_range"];
const ORDERED_KEYS: &[&str] = &["orderedAt", "ordered_at"];
const RESULT_DATE_KEYS: &[&str] = &["resultDate", "result_date"];
const VERIFIED_KEYS: &[&str] = &["verifiedAt", "verified_at"];
const VERIFIED_BY_KEYS: &[&str] = &["verifiedByName", "verified_by_name"];

/// Group header written to 8410
pub const LAB_HEADER_TEXT: &str = "Laboratory";

/// Written to 6313 when no lab order yields any line
pub const EMPTY_PLACEHOLDER: &str = "Laboratory: No lab history recorded";

/// Single-letter order status; unknown values count as ordered
pub fn status_code(status: &str) -> &'static str {
    match status.trim().to_lowercase().as_str() {
        "pending" => "P",
        "completed" => "C",
        "cancelled" => "X",
        _ => "O",
    }
}

/// Flattens structured result entries into one line
///
/// Each entry renders as `label: value unit (Ref: range) [flag]`, entries
/// are joined with `"; "`. The details may be an array or a JSON string
/// holding one; anything else yields `None`.
pub fn format_result_details(raw: &Value) -> Option<String> {
    let parsed;
    let details = match raw {
        Value::Array(entries) => entries,
        Value::String(text) => {
            parsed = safe_json_parse(text)?;
            parsed.as_array()?
        }
        _ => return None,
    };

    let entries: Vec<String> = details
        .iter()
        .filter(|entry| !is_blank(entry))
        .map(|entry| match Record::from_value(entry) {
            Some(record) => format_detail(&record),
            None => format!("Result: {}", value_text(entry).trim()),
        })
        .collect();

    (!entries.is_empty()).then(|| entries.join("; "))
}

fn format_detail(record: &Record<'_>) -> String {
    let label = text_field(record, DETAIL_LABEL_KEYS).unwrap_or_else(|| "Result".to_string());
    let value = record.get("value").map(value_text).unwrap_or_default();
    let unit = text_field(record, &["unit"])
        .map(|unit| format!(" {unit}"))
        .unwrap_or_default();
    let reference = text_field(record, DETAIL_REFERENCE_KEYS)
        .map(|range| format!(" (Ref: {range})"))
        .unwrap_or_default();
    let flag = text_field(record, &["flag"])
        .map(|flag| format!(" [{flag}]"))
        .unwrap_or_default();
    format!("{label}: {value}{unit}{reference}{flag}")
        .trim()
        .to_string()
}

/// One group per lab order object
///
/// An empty list (or one without any object entries) yields the single
/// placeholder line.
pub fn build(orders: &[Value], settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);

    for record in orders.iter().filter_map(Record::from_value) {
        writer.push(tags::LAB_HEADER, LAB_HEADER_TEXT);
        writer.push_some(tags::LAB_TEST_NAME, text_field(&record, NAME_KEYS));
        writer.push_some(tags::LAB_RESULT, text_field(&record, &["result"]));
        writer.push_some(
            tags::LAB_DETAILS,
            record.first(DETAIL_KEYS).and_then(format_result_details),
        );
        writer.push_some(tags::LAB_ORDERED_DATE, date_field(&record, ORDERED_KEYS));
        writer.push_some(tags::LAB_RESULT_DATE, date_field(&record, RESULT_DATE_KEYS));
        writer.push_some(
            tags::LAB_STATUS,
            text_field(&record, &["status"]).map(|status| status_code(&status)),
        );
        writer.push_some(tags::LAB_PRIORITY, text_field(&record, &["priority"]));
        writer.push_some(tags::LAB_NOTES, text_field(&record, &["notes"]));
        writer.push_some(
            tags::LAB_VERIFIED_DATE,
            record
                .first(VERIFIED_KEYS)
                .and_then(format_date)
                .map(|date| format!("Verified {date}")),
        );
        writer.push_some(
            tags::LAB_VERIFIED_BY,
            text_field(&record, VERIFIED_BY_KEYS).map(|name| format!("Verified by {name}")),
        );
    }

    if writer.is_empty() {
        writer.push(tags::FREE_TEXT, EMPTY_PLACEHOLDER);
    }
    writer.finish(SectionKind::LabOrders)
}
