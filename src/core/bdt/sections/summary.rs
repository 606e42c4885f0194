//! Consolidated patient summary across all visits

use super::visits::DOCTOR_SUMMARY_KEYS;
use super::{condensed_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::core::normalize::parse_datetime;
use crate::domain::Record;
use chrono::NaiveDateTime;
use serde_json::Value;

const SUMMARY_DATE_KEYS: &[&str] = &["visitDate", "visit_date", "updatedAt", "updated_at"];

/// Header written to 6315
pub const PATIENT_SUMMARY_HEADER_TEXT: &str = "PatientSummary";

/// Date label for summaries without a usable date
pub const UNKNOWN_DATE_LABEL: &str = "Unknown";

struct SummaryEntry {
    date: Option<NaiveDateTime>,
    text: String,
}

/// Every visit's doctor summary, newest first
///
/// Each entry is `[DDMMYYYY] text`. Undated entries (and entries whose date
/// does not parse) sort last, keep their input order and carry `[Unknown]`.
/// No summaries means no lines, not even the header.
pub fn build(visits: &[Value], settings: &GeneratorSettings) -> Section {
    let mut entries: Vec<SummaryEntry> = visits
        .iter()
        .filter_map(Record::from_value)
        .filter_map(|visit| {
            let text = condensed_field(&visit, DOCTOR_SUMMARY_KEYS)?;
            let date = visit.first(SUMMARY_DATE_KEYS).and_then(parse_datetime);
            Some(SummaryEntry { date, text })
        })
        .collect();

    let mut writer = SectionWriter::new(settings);
    if entries.is_empty() {
        return writer.finish(SectionKind::Summary);
    }

    // None orders before Some, so a reversed comparison puts undated last.
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    writer.push(tags::PATIENT_SUMMARY_HEADER, PATIENT_SUMMARY_HEADER_TEXT);
    for entry in entries {
        let label = entry
            .date
            .map(|date| date.format("%d%m%Y").to_string())
            .unwrap_or_else(|| UNKNOWN_DATE_LABEL.to_string());
        writer.push(
            tags::PATIENT_SUMMARY_ENTRY,
            format!("[{label}] {}", entry.text),
        );
    }

    writer.finish(SectionKind::Summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_newest_first_undated_last() {
        let visits = vec![
            json!({"doctorSummary": "Undated note"}),
            json!({"visitDate": "2023-06-01", "doctorSummary": "Older note"}),
            json!({"visitDate": "2024-01-01T10:00:00Z", "doctorSummary": "Newest   note"}),
        ];
        let section = build(&visits, &GeneratorSettings::default());
        assert_eq!(
            section.rendered(),
            vec![
                "0216315PatientSummary",
                "0296316[01012024] Newest note",
                "0286316[01062023] Older note",
                "0296316[Unknown] Undated note"
            ]
        );
    }

    #[test]
    fn test_updated_at_is_a_fallback_date() {
        let visits = vec![json!({"updated_at": "2024-01-01", "doctor_summary": "Newest note"})];
        let lines = build(&visits, &GeneratorSettings::default()).rendered();
        assert_eq!(lines[1], "0296316[01012024] Newest note");
    }

    #[test]
    fn test_unparseable_date_counts_as_unknown() {
        let visits = vec![
            json!({"visitDate": "last week", "doctorSummary": "Undated note"}),
            json!({"visitDate": "2023-06-01", "doctorSummary": "Older note"}),
        ];
        let lines = build(&visits, &GeneratorSettings::default()).rendered();
        assert_eq!(lines[1], "0286316[01062023] Older note");
        assert_eq!(lines[2], "0296316[Unknown] Undated note");
    }

    #[test]
    fn test_no_summaries_no_lines() {
        let visits = vec![json!({"visitDate": "2024-01-01", "doctorSummary": "   "}), json!({})];
        assert!(build(&visits, &GeneratorSettings::default()).is_empty());
        assert!(build(&[], &GeneratorSettings::default()).is_empty());
    }
}
