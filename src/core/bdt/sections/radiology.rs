//! Radiology orders

use super::{date_field, text_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::domain::Record;
use serde_json::Value;

const NAME_KEYS: &[&str] = &["testName", "test_name"];
const ORDERED_KEYS: &[&str] = &["orderedAt", "ordered_at"];

/// Group header written to 6330
pub const PROCEDURE_HEADER_TEXT: &str = "Procedure";

/// One group per radiology order; no orders means no lines
///
/// The procedure name line is written even when the name is unknown.
/// Notes go to the profile's radiology-notes tag, which in the legacy
/// profile is the result tag.
pub fn build(orders: &[Value], settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);

    for record in orders.iter().filter_map(Record::from_value) {
        writer.push(tags::PROCEDURE_HEADER, PROCEDURE_HEADER_TEXT);
        writer.push(
            tags::PROCEDURE_NAME,
            text_field(&record, NAME_KEYS).unwrap_or_default(),
        );
        writer.push_some(tags::PROCEDURE_DATE, date_field(&record, ORDERED_KEYS));
        writer.push_some(tags::PROCEDURE_RESULT, text_field(&record, &["result"]));
        writer.push_some(settings.tags.radiology_notes, text_field(&record, &["notes"]));
    }

    writer.finish(SectionKind::RadiologyOrders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bdt::tags::TagProfile;
    use crate::core::bdt::field::OverflowPolicy;
    use serde_json::json;

    fn order() -> Vec<Value> {
        vec![json!({
            "testName": "Chest X-ray",
            "orderedAt": "2024-03-15T14:00:00Z",
            "result": "No acute findings",
            "notes": "Compare with prior"
        })]
    }

    #[test]
    fn test_no_orders_no_lines() {
        assert!(build(&[], &GeneratorSettings::default()).is_empty());
    }

    #[test]
    fn test_legacy_profile_shares_result_tag() {
        let section = build(&order(), &GeneratorSettings::default());
        assert_eq!(
            section.rendered(),
            vec![
                "0166330Procedure",
                "0186333Chest X-ray",
                "015633115032024",
                "0246334No acute findings",
                "0256334Compare with prior"
            ]
        );
    }

    #[test]
    fn test_distinct_profile_moves_notes() {
        let settings = GeneratorSettings::new(OverflowPolicy::Split, TagProfile::distinct());
        let lines = build(&order(), &settings).rendered();
        assert_eq!(lines[4], "0256335Compare with prior");
    }

    #[test]
    fn test_unnamed_procedure_keeps_name_line() {
        let lines = build(&[json!({"test_name": null})], &GeneratorSettings::default()).rendered();
        assert_eq!(lines, vec!["0166330Procedure", "0076333"]);
    }
}
