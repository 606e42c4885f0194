//! Chronic conditions, written as confirmed diagnoses

use super::{text_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::core::normalize::{resolve_array, value_text};
use crate::domain::chart::is_blank;
use crate::domain::Record;

const CONDITION_KEYS: &[&str] = &["chronicConditions", "chronic_conditions"];
const ICD_CODE_KEYS: &[&str] = &["icd_code", "icdCode", "code"];
const NAME_KEYS: &[&str] = &["name", "description"];

/// Group header written to 6200
pub const DIAGNOSIS_HEADER_TEXT: &str = "Diagnosis";

/// Diagnosis certainty: confirmed
pub const STATUS_CONFIRMED: &str = "G";

pub fn build(patient: &Record<'_>, settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);
    let conditions = resolve_array(&[patient.first(CONDITION_KEYS)]);

    for condition in conditions.iter().filter(|entry| !is_blank(entry)) {
        writer.push(tags::DIAGNOSIS_HEADER, DIAGNOSIS_HEADER_TEXT);
        match Record::from_value(condition) {
            Some(record) => {
                writer.push_some(tags::DIAGNOSIS_CODE, text_field(&record, ICD_CODE_KEYS));
                writer.push_some(tags::DIAGNOSIS_TEXT, text_field(&record, NAME_KEYS));
            }
            None => writer.push(tags::DIAGNOSIS_TEXT, value_text(condition)),
        }
        writer.push(tags::DIAGNOSIS_STATUS, STATUS_CONFIRMED);
    }

    writer.finish(SectionKind::ChronicConditions)
}
