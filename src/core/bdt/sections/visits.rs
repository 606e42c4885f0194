//! Visits (clinical notes)

use super::{condensed_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::field::FieldTag;
use crate::core::bdt::tags;
use crate::core::normalize::{
    format_date, format_key_value_pairs, format_number, format_time, normalize_vitals,
    safe_json_parse, NormalizedVitals,
};
use crate::domain::Record;
use serde_json::Value;

pub(crate) const VISIT_DATE_KEYS: &[&str] = &["visitDate", "visit_date"];
pub(crate) const DOCTOR_SUMMARY_KEYS: &[&str] = &["doctorSummary", "doctor_summary"];
const VITALS_KEYS: &[&str] = &["vitals", "vitals_json"];
const CHIEF_COMPLAINT_KEYS: &[&str] = &["chiefComplaint", "chief_complaint"];
const REASON_KEYS: &[&str] = &[
    "reasonForVisit",
    "reason_for_visit",
    "visitReason",
    "visit_reason",
];
const HPI_KEYS: &[&str] = &["hpi"];
const REVIEW_OF_SYSTEMS_KEYS: &[&str] = &["reviewOfSystems", "review_of_systems", "ros_json"];
const PHYSICAL_EXAM_KEYS: &[&str] = &["physicalExam", "physical_exam_json"];
const DIAGNOSIS_KEYS: &[&str] = &["diagnosis"];
const TREATMENT_PLAN_KEYS: &[&str] = &["treatmentPlan", "treatment_plan"];

/// Group header written to 6300
pub const CLINICAL_NOTE_HEADER_TEXT: &str = "ClinicalNote";

/// One clinical-note group per visit object, in input order
pub fn build(visits: &[Value], settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);

    for visit in visits.iter().filter_map(Record::from_value) {
        writer.push(tags::CLINICAL_NOTE_HEADER, CLINICAL_NOTE_HEADER_TEXT);

        if let Some(visit_date) = visit.first(VISIT_DATE_KEYS) {
            writer.push_some(tags::VISIT_DATE, format_date(visit_date));
            writer.push_some(tags::VISIT_TIME, format_time(visit_date));
        }

        write_vitals(&mut writer, &normalize_vitals(visit.first(VITALS_KEYS)));

        writer.push_some(
            tags::CHIEF_COMPLAINT,
            condensed_field(&visit, CHIEF_COMPLAINT_KEYS),
        );
        writer.push_some(
            settings.tags.reason_for_visit,
            condensed_field(&visit, REASON_KEYS),
        );
        writer.push_some(
            tags::HISTORY_OF_PRESENT_ILLNESS,
            condensed_field(&visit, HPI_KEYS),
        );
        writer.push_some(
            tags::REVIEW_OF_SYSTEMS,
            structured_field(&visit, REVIEW_OF_SYSTEMS_KEYS),
        );
        writer.push_some(
            tags::PHYSICAL_EXAM,
            structured_field(&visit, PHYSICAL_EXAM_KEYS),
        );
        writer.push_some(tags::VISIT_DIAGNOSIS, condensed_field(&visit, DIAGNOSIS_KEYS));
        writer.push_some(
            tags::TREATMENT_PLAN,
            condensed_field(&visit, TREATMENT_PLAN_KEYS),
        );
        writer.push_some(
            tags::VISIT_SUMMARY,
            condensed_field(&visit, DOCTOR_SUMMARY_KEYS),
        );
    }

    writer.finish(SectionKind::Visits)
}

/// Fixed vitals fields, then one summary line holding every fragment
fn write_vitals(writer: &mut SectionWriter, vitals: &NormalizedVitals) {
    let fixed: [(FieldTag, Option<f64>); 6] = [
        (tags::SYSTOLIC, vitals.systolic),
        (tags::DIASTOLIC, vitals.diastolic),
        (tags::HEART_RATE, vitals.heart_rate),
        (tags::TEMPERATURE, vitals.temperature),
        (tags::WEIGHT, vitals.weight),
        (tags::HEIGHT, vitals.height),
    ];
    for (tag, value) in fixed {
        writer.push_some(tag, value.map(format_number));
    }

    if !vitals.summary_parts.is_empty() {
        writer.push(
            tags::FREE_TEXT,
            format!("Vitals: {}", vitals.summary_parts.join(", ")),
        );
    }
}

/// Review-of-systems and physical-exam blocks, flattened to one line
///
/// Stored JSON text is decoded first so `ros_json` columns flatten the same
/// way as inline objects.
fn structured_field(visit: &Record<'_>, keys: &[&str]) -> Option<String> {
    let raw = visit.first(keys)?;
    let text = match raw {
        Value::String(text) => match safe_json_parse(text) {
            Some(decoded @ (Value::Object(_) | Value::Array(_))) => {
                format_key_value_pairs(&decoded)
            }
            _ => format_key_value_pairs(raw),
        },
        other => format_key_value_pairs(other),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bdt::field::OverflowPolicy;
    use crate::core::bdt::tags::TagProfile;
    use serde_json::json;

    fn full_visit() -> Value {
        json!({
            "visitDate": "2024-11-12T09:30:00Z",
            "vitals": {"bloodPressure": "120/80", "pulse": "70"},
            "chiefComplaint": "Cough",
            "reasonForVisit": "Follow-up",
            "hpi": "Three   days of\ndry cough",
            "reviewOfSystems": {"general": "no fever", "respiratory": "dry cough"},
            "physical_exam_json": "{\"lungs\": \"clear\"}",
            "diagnosis": "Viral bronchitis",
            "treatmentPlan": "Rest and fluids",
            "doctorSummary": "Improving"
        })
    }

    #[test]
    fn test_full_visit() {
        let section = build(&[full_visit()], &GeneratorSettings::default());
        assert_eq!(
            section.rendered(),
            vec![
                "0196300ClinicalNote",
                "015630112112024",
                "0136302093000",
                "0103622120",
                "009362380",
                "009362470",
                "0486313Vitals: BP 120/80 mmHg, Heart Rate 70 bpm",
                "0126306Cough",
                "0166304Follow-up",
                "0306305Three days of dry cough",
                "0486304General: no fever; Respiratory: dry cough",
                "0196307Lungs: clear",
                "0236308Viral bronchitis",
                "0226309Rest and fluids",
                "0166310Improving"
            ]
        );
    }

    #[test]
    fn test_distinct_profile_moves_reason_for_visit() {
        let settings = GeneratorSettings::new(OverflowPolicy::Split, TagProfile::distinct());
        let lines = build(&[full_visit()], &settings).rendered();
        assert!(lines.contains(&"0166303Follow-up".to_string()));
        assert!(!lines.contains(&"0166304Follow-up".to_string()));
    }

    #[test]
    fn test_minimal_visit_is_header_only() {
        let lines = build(&[json!({})], &GeneratorSettings::default()).rendered();
        assert_eq!(lines, vec!["0196300ClinicalNote"]);
    }

    #[test]
    fn test_invalid_visit_date_omits_date_and_time() {
        let lines = build(&[json!({"visit_date": "soon"})], &GeneratorSettings::default()).rendered();
        assert_eq!(lines, vec!["0196300ClinicalNote"]);
    }

    #[test]
    fn test_vitals_without_pressure() {
        let visit = json!({"vitals_json": "{\"temp\": \"37.8\", \"spo2\": 97}"});
        let lines = build(&[visit], &GeneratorSettings::default()).rendered();
        assert_eq!(
            lines,
            vec![
                "0196300ClinicalNote",
                "011362537.8",
                "0446313Vitals: Temperature 37.8 °C, SpO2 97%"
            ]
        );
    }

    #[test]
    fn test_non_object_visits_are_skipped() {
        assert!(build(&[json!("visit"), json!(null)], &GeneratorSettings::default()).is_empty());
    }
}
