//! Patient demographics

use super::{date_field, text_field, GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::core::normalize::{format_number, parse_numeric, value_text};
use crate::domain::{PatientId, Record};

const LAST_NAME_KEYS: &[&str] = &["lastName", "last_name"];
const FIRST_NAME_KEYS: &[&str] = &["firstName", "first_name"];
const DATE_OF_BIRTH_KEYS: &[&str] = &["dateOfBirth", "date_of_birth"];
const GENDER_KEYS: &[&str] = &["gender"];
const ADDRESS_KEYS: &[&str] = &["address"];
const PHONE_KEYS: &[&str] = &["phone"];
const EMAIL_KEYS: &[&str] = &["email"];
const INSURANCE_KEYS: &[&str] = &["insurance"];
const BLOOD_TYPE_KEYS: &[&str] = &["bloodType", "blood_type"];
const EMERGENCY_CONTACT_KEYS: &[&str] = &["emergencyContact", "emergency_contact"];
const WEIGHT_KEYS: &[&str] = &["weightKg", "weight_kg"];
const HEIGHT_KEYS: &[&str] = &["heightCm", "height_cm"];

/// Maps free-text gender to the single-letter BDT code
///
/// The first letter decides, case-insensitively: `M`, `F` and `D` are kept,
/// anything else (including empty input) is `U`.
///
/// # Examples
///
/// ```
/// use bdt_export::core::bdt::sections::demographics::gender_code;
///
/// assert_eq!(gender_code("female"), 'F');
/// assert_eq!(gender_code("Divers"), 'D');
/// assert_eq!(gender_code("nonbinary"), 'U');
/// ```
pub fn gender_code(gender: &str) -> char {
    match gender.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        Some(code @ ('M' | 'F' | 'D')) => code,
        _ => 'U',
    }
}

/// Weight and height are written as a number when one can be found
fn measurement(record: &Record<'_>, keys: &[&str]) -> Option<String> {
    let raw = record.first(keys)?;
    let content = match parse_numeric(raw) {
        Some(number) => format_number(number),
        None => value_text(raw).trim().to_string(),
    };
    (!content.is_empty()).then_some(content)
}

pub fn build(patient: &Record<'_>, patient_id: &PatientId, settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);

    writer.push_some(tags::LAST_NAME, text_field(patient, LAST_NAME_KEYS));
    writer.push_some(tags::FIRST_NAME, text_field(patient, FIRST_NAME_KEYS));
    writer.push_some(tags::DATE_OF_BIRTH, date_field(patient, DATE_OF_BIRTH_KEYS));
    writer.push_some(
        tags::GENDER,
        text_field(patient, GENDER_KEYS).map(|gender| gender_code(&gender).to_string()),
    );
    writer.push_some(tags::ADDRESS, text_field(patient, ADDRESS_KEYS));
    writer.push_some(tags::PHONE, text_field(patient, PHONE_KEYS));
    writer.push_some(tags::EMAIL, text_field(patient, EMAIL_KEYS));
    writer.push_some(tags::INSURANCE, text_field(patient, INSURANCE_KEYS));
    writer.push(tags::PATIENT_NUMBER, patient_id.as_str());
    writer.push_some(tags::BLOOD_TYPE, text_field(patient, BLOOD_TYPE_KEYS));
    writer.push_some(
        tags::EMERGENCY_CONTACT,
        text_field(patient, EMERGENCY_CONTACT_KEYS),
    );
    writer.push_some(tags::WEIGHT, measurement(patient, WEIGHT_KEYS));
    writer.push_some(tags::HEIGHT, measurement(patient, HEIGHT_KEYS));

    writer.finish(SectionKind::Demographics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use test_case::test_case;

    fn run(patient: Value) -> Vec<String> {
        let record = Record::from_value(&patient).unwrap();
        let id = PatientId::from_value(&patient["id"]).unwrap();
        build(&record, &id, &GeneratorSettings::default()).rendered()
    }

    #[test_case("Male", 'M')]
    #[test_case("m", 'M')]
    #[test_case("MALE", 'M')]
    #[test_case("Female", 'F')]
    #[test_case("f", 'F')]
    #[test_case("Divers", 'D')]
    #[test_case("d", 'D')]
    #[test_case("unknown", 'U')]
    #[test_case("", 'U')]
    #[test_case("nonbinary", 'U')]
    fn test_gender_code(input: &str, expected: char) {
        assert_eq!(gender_code(input), expected);
    }

    #[test]
    fn test_minimal_patient() {
        let lines = run(json!({
            "id": 1,
            "firstName": "Jane",
            "lastName": "Doe",
            "dateOfBirth": "1990-01-01",
            "gender": "female"
        }));
        assert_eq!(
            lines,
            vec![
                "0103100Doe",
                "0113101Jane",
                "015311001011990",
                "0083111F",
                "00836281"
            ]
        );
    }

    #[test]
    fn test_patient_number_always_present() {
        let lines = run(json!({"id": "A7"}));
        assert_eq!(lines, vec!["0093628A7"]);
    }

    #[test]
    fn test_full_patient_in_fixed_order() {
        let lines = run(json!({
            "id": 5,
            "last_name": "Müller",
            "firstName": "Jörg",
            "address": "Hauptstr. 1, 10115 Berlin",
            "phone": "+49 30 1234",
            "email": "j@example.org",
            "insurance": "AOK",
            "bloodType": "A+",
            "emergencyContact": "Anna Müller",
            "weightKg": "82.5 kg",
            "heightCm": "tall"
        }));
        let tags: Vec<&str> = lines.iter().map(|line| &line[3..7]).collect();
        assert_eq!(
            tags,
            vec!["3100", "3101", "3102", "3112", "3116", "3105", "3628", "3629", "3630", "3626", "3627"]
        );
        assert_eq!(lines[0], "0133100Müller");
        assert_eq!(lines[9], "011362682.5");
        assert_eq!(lines[10], "0113627tall");
    }

    #[test]
    fn test_invalid_date_of_birth_is_omitted() {
        let lines = run(json!({"id": 1, "dateOfBirth": "sometime"}));
        assert!(lines.iter().all(|line| &line[3..7] != "3110"));
    }

    #[test]
    fn test_numeric_measurements() {
        let lines = run(json!({"id": 1, "weightKg": 70, "heightCm": 172.5}));
        assert!(lines.contains(&"009362670".to_string()));
        assert!(lines.contains(&"0123627172.5".to_string()));
    }
}
