//! Allergies

use super::{text_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::core::normalize::{resolve_array, value_text};
use crate::domain::chart::is_blank;
use crate::domain::Record;
use serde_json::Value;

const ALLERGY_KEYS: &[&str] = &["allergies"];
const SUBSTANCE_KEYS: &[&str] = &["name", "substance", "allergen"];

/// Group header written to 8401
pub const ALLERGY_HEADER_TEXT: &str = "Allergy";

/// One group of 2-4 lines per allergy
///
/// The list may be an array or a JSON string holding one; entries are plain
/// substance names or `{name, severity, reaction}` objects. An object
/// without a name falls back to its compact JSON as the substance.
pub fn build(patient: &Record<'_>, settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);
    let allergies = resolve_array(&[patient.first(ALLERGY_KEYS)]);

    for allergy in allergies.iter().filter(|entry| !is_blank(entry)) {
        let record = Record::from_value(allergy);
        let substance = record
            .as_ref()
            .and_then(|record| text_field(record, SUBSTANCE_KEYS))
            .unwrap_or_else(|| value_text(allergy).trim().to_string());

        writer.push(tags::ALLERGY_HEADER, ALLERGY_HEADER_TEXT);
        writer.push(tags::ALLERGY_SUBSTANCE, substance);
        if let Some(record) = record {
            writer.push_some(tags::ALLERGY_SEVERITY, text_field(&record, &["severity"]));
            writer.push_some(tags::ALLERGY_REACTION, text_field(&record, &["reaction"]));
        }
    }

    writer.finish(SectionKind::Allergies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(patient: Value) -> Vec<String> {
        let record = Record::from_value(&patient).unwrap();
        build(&record, &GeneratorSettings::default()).rendered()
    }

    #[test]
    fn test_string_allergy() {
        assert_eq!(
            run(json!({"allergies": ["Penicillin"]})),
            vec!["0148401Allergy", "0178402Penicillin"]
        );
    }

    #[test]
    fn test_object_allergy_with_details() {
        let lines = run(json!({
            "allergies": [{"name": "Peanuts", "severity": "severe", "reaction": "anaphylaxis"}]
        }));
        assert_eq!(
            lines,
            vec![
                "0148401Allergy",
                "0148402Peanuts",
                "0138403severe",
                "0188404anaphylaxis"
            ]
        );
    }

    #[test]
    fn test_json_string_list() {
        let lines = run(json!({"allergies": "[\"Latex\", {\"name\": \"Pollen\"}]"}));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "0128402Latex");
        assert_eq!(lines[3], "0138402Pollen");
    }

    #[test]
    fn test_missing_malformed_or_blank() {
        assert!(run(json!({})).is_empty());
        assert!(run(json!({"allergies": "not json"})).is_empty());
        assert!(run(json!({"allergies": [null, "  "]})).is_empty());
    }

    #[test]
    fn test_unnamed_object_keeps_its_content() {
        let lines = run(json!({"allergies": [{"severity": "mild"}]}));
        assert_eq!(lines[1], "0268402{\"severity\":\"mild\"}");
        assert_eq!(lines[2], "0118403mild");
    }
}
