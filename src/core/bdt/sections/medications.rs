//! Medications

use super::{date_field, text_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::core::normalize::value_text;
use crate::domain::Record;
use serde_json::{json, Value};

const NAME_KEYS: &[&str] = &[
    "medicationName",
    "medication_name",
    "drugName",
    "drug_name",
    "item",
    "item_name",
];
const CREATED_KEYS: &[&str] = &["createdAt", "created_at"];

/// Group header written to 6220
pub const MEDICATION_HEADER_TEXT: &str = "Medication";

/// Prescription status: active
pub const STATUS_ACTIVE: &str = "A";

/// Written to 6313 when no prescription yields any line
pub const EMPTY_PLACEHOLDER: &str = "Medications: No medication history recorded";

/// Brings prescription entries into object form
///
/// Bare strings (and other scalars) are names: `"Ibuprofen"` becomes
/// `{"medicationName": "Ibuprofen"}`. Empty objects are dropped.
pub fn normalize_prescriptions(entries: Vec<Value>) -> Vec<Value> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(map) if map.is_empty() => None,
            Value::Object(map) => Some(Value::Object(map)),
            other => Some(json!({ "medicationName": value_text(&other).trim() })),
        })
        .collect()
}

/// One group per prescription with a resolvable name
///
/// Prescriptions without a name are skipped; if that leaves nothing, the
/// section is the single placeholder line.
pub fn build(prescriptions: &[Value], settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);

    for record in prescriptions.iter().filter_map(Record::from_value) {
        let Some(name) = text_field(&record, NAME_KEYS) else {
            continue;
        };

        writer.push(tags::MEDICATION_HEADER, MEDICATION_HEADER_TEXT);
        writer.push(tags::MEDICATION_NAME, name);

        let dosage = ["dosage", "frequency", "duration"]
            .iter()
            .filter_map(|key| text_field(&record, &[*key]))
            .collect::<Vec<_>>();
        if !dosage.is_empty() {
            writer.push(tags::MEDICATION_DOSAGE, dosage.join(" - "));
        }

        writer.push_some(tags::MEDICATION_START_DATE, date_field(&record, CREATED_KEYS));
        writer.push(tags::MEDICATION_STATUS, STATUS_ACTIVE);
        writer.push_some(
            tags::MEDICATION_INSTRUCTIONS,
            text_field(&record, &["instructions"]),
        );
    }

    if writer.is_empty() {
        writer.push(tags::FREE_TEXT, EMPTY_PLACEHOLDER);
    }
    writer.finish(SectionKind::Medications)
}
