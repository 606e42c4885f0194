//! Field tag vocabulary
//!
//! The consuming practice software keys on these exact values. Most are
//! taken from BDT 3.1; a few (allergy, laboratory and summary tags) are
//! local extensions the consumer was configured for.

use super::field::FieldTag;

// Header
pub const BDT_VERSION: FieldTag = FieldTag::from_static("8000");
pub const SOFTWARE_ID: FieldTag = FieldTag::from_static("9206");
pub const RECORD_TYPE: FieldTag = FieldTag::from_static("8316");
pub const PATIENT_ID: FieldTag = FieldTag::from_static("8100");

// Demographics
pub const LAST_NAME: FieldTag = FieldTag::from_static("3100");
pub const FIRST_NAME: FieldTag = FieldTag::from_static("3101");
pub const ADDRESS: FieldTag = FieldTag::from_static("3102");
pub const INSURANCE: FieldTag = FieldTag::from_static("3105");
pub const DATE_OF_BIRTH: FieldTag = FieldTag::from_static("3110");
pub const GENDER: FieldTag = FieldTag::from_static("3111");
pub const PHONE: FieldTag = FieldTag::from_static("3112");
pub const EMAIL: FieldTag = FieldTag::from_static("3116");
pub const PATIENT_NUMBER: FieldTag = FieldTag::from_static("3628");
pub const BLOOD_TYPE: FieldTag = FieldTag::from_static("3629");
pub const EMERGENCY_CONTACT: FieldTag = FieldTag::from_static("3630");

// Vitals (shared by demographics and visits)
pub const SYSTOLIC: FieldTag = FieldTag::from_static("3622");
pub const DIASTOLIC: FieldTag = FieldTag::from_static("3623");
pub const HEART_RATE: FieldTag = FieldTag::from_static("3624");
pub const TEMPERATURE: FieldTag = FieldTag::from_static("3625");
pub const WEIGHT: FieldTag = FieldTag::from_static("3626");
pub const HEIGHT: FieldTag = FieldTag::from_static("3627");

// Allergies
pub const ALLERGY_HEADER: FieldTag = FieldTag::from_static("8401");
pub const ALLERGY_SUBSTANCE: FieldTag = FieldTag::from_static("8402");
pub const ALLERGY_SEVERITY: FieldTag = FieldTag::from_static("8403");
pub const ALLERGY_REACTION: FieldTag = FieldTag::from_static("8404");

// Chronic conditions
pub const DIAGNOSIS_HEADER: FieldTag = FieldTag::from_static("6200");
pub const DIAGNOSIS_CODE: FieldTag = FieldTag::from_static("6201");
pub const DIAGNOSIS_TEXT: FieldTag = FieldTag::from_static("6202");
pub const DIAGNOSIS_STATUS: FieldTag = FieldTag::from_static("6203");

// Medications
pub const MEDICATION_HEADER: FieldTag = FieldTag::from_static("6220");
pub const MEDICATION_NAME: FieldTag = FieldTag::from_static("6221");
pub const MEDICATION_DOSAGE: FieldTag = FieldTag::from_static("6222");
pub const MEDICATION_START_DATE: FieldTag = FieldTag::from_static("6223");
pub const MEDICATION_STATUS: FieldTag = FieldTag::from_static("6225");
pub const MEDICATION_INSTRUCTIONS: FieldTag = FieldTag::from_static("6226");

// Laboratory
pub const LAB_HEADER: FieldTag = FieldTag::from_static("8410");
pub const LAB_TEST_NAME: FieldTag = FieldTag::from_static("8411");
pub const LAB_RESULT: FieldTag = FieldTag::from_static("8412");
pub const LAB_DETAILS: FieldTag = FieldTag::from_static("8413");
pub const LAB_ORDERED_DATE: FieldTag = FieldTag::from_static("8418");
pub const LAB_RESULT_DATE: FieldTag = FieldTag::from_static("8419");
pub const LAB_STATUS: FieldTag = FieldTag::from_static("8420");
pub const LAB_PRIORITY: FieldTag = FieldTag::from_static("8421");
pub const LAB_NOTES: FieldTag = FieldTag::from_static("8422");
pub const LAB_VERIFIED_DATE: FieldTag = FieldTag::from_static("8423");
pub const LAB_VERIFIED_BY: FieldTag = FieldTag::from_static("8424");

// Radiology
pub const PROCEDURE_HEADER: FieldTag = FieldTag::from_static("6330");
pub const PROCEDURE_DATE: FieldTag = FieldTag::from_static("6331");
pub const PROCEDURE_NAME: FieldTag = FieldTag::from_static("6333");
pub const PROCEDURE_RESULT: FieldTag = FieldTag::from_static("6334");
/// Radiology notes when distinct tags are enabled
pub const PROCEDURE_NOTES: FieldTag = FieldTag::from_static("6335");

// Visits
pub const CLINICAL_NOTE_HEADER: FieldTag = FieldTag::from_static("6300");
pub const VISIT_DATE: FieldTag = FieldTag::from_static("6301");
pub const VISIT_TIME: FieldTag = FieldTag::from_static("6302");
/// Reason for visit when distinct tags are enabled
pub const REASON_FOR_VISIT: FieldTag = FieldTag::from_static("6303");
pub const REVIEW_OF_SYSTEMS: FieldTag = FieldTag::from_static("6304");
pub const HISTORY_OF_PRESENT_ILLNESS: FieldTag = FieldTag::from_static("6305");
pub const CHIEF_COMPLAINT: FieldTag = FieldTag::from_static("6306");
pub const PHYSICAL_EXAM: FieldTag = FieldTag::from_static("6307");
pub const VISIT_DIAGNOSIS: FieldTag = FieldTag::from_static("6308");
pub const TREATMENT_PLAN: FieldTag = FieldTag::from_static("6309");
pub const VISIT_SUMMARY: FieldTag = FieldTag::from_static("6310");

/// Free-text note; carries vitals summaries and empty-section placeholders
pub const FREE_TEXT: FieldTag = FieldTag::from_static("6313");

// Consolidated summary
pub const PATIENT_SUMMARY_HEADER: FieldTag = FieldTag::from_static("6315");
pub const PATIENT_SUMMARY_ENTRY: FieldTag = FieldTag::from_static("6316");

/// Tags that legacy exports shared between two different fields
///
/// The consuming software was built against files where reason-for-visit
/// and review-of-systems both used 6304, and radiology result and notes
/// both used 6334. `legacy()` keeps that layout; `distinct()` gives the
/// second field of each pair its own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagProfile {
    pub reason_for_visit: FieldTag,
    pub radiology_notes: FieldTag,
}

impl TagProfile {
    pub const fn legacy() -> Self {
        Self {
            reason_for_visit: REVIEW_OF_SYSTEMS,
            radiology_notes: PROCEDURE_RESULT,
        }
    }

    pub const fn distinct() -> Self {
        Self {
            reason_for_visit: REASON_FOR_VISIT,
            radiology_notes: PROCEDURE_NOTES,
        }
    }

    pub fn from_flag(distinct_tags: bool) -> Self {
        if distinct_tags {
            Self::distinct()
        } else {
            Self::legacy()
        }
    }
}

impl Default for TagProfile {
    fn default() -> Self {
        Self::legacy()
    }
}

/// Human-readable label for a tag, used by the inspector
pub fn label(tag: &str) -> Option<&'static str> {
    let label = match tag {
        "8000" => "BDT Version",
        "9206" => "Software ID",
        "8316" => "Record Type",
        "8100" => "Patient ID",
        "3100" => "Last Name",
        "3101" => "First Name",
        "3102" => "Address",
        "3105" => "Insurance",
        "3110" => "Date of Birth",
        "3111" => "Gender",
        "3112" => "Phone",
        "3116" => "Email",
        "3628" => "Patient Number",
        "3629" => "Blood Type",
        "3630" => "Emergency Contact",
        "3622" => "Systolic BP",
        "3623" => "Diastolic BP",
        "3624" => "Heart Rate",
        "3625" => "Temperature",
        "3626" => "Weight",
        "3627" => "Height",
        "8401" => "Allergy Header",
        "8402" => "Allergy Substance",
        "8403" => "Allergy Severity",
        "8404" => "Allergy Reaction",
        "6200" => "Diagnosis Header",
        "6201" => "Diagnosis Code",
        "6202" => "Diagnosis Text",
        "6203" => "Diagnosis Status",
        "6220" => "Medication Header",
        "6221" => "Medication Name",
        "6222" => "Medication Dosage",
        "6223" => "Medication Start Date",
        "6225" => "Medication Status",
        "6226" => "Medication Instructions",
        "8410" => "Lab Header",
        "8411" => "Lab Test Name",
        "8412" => "Lab Result Summary",
        "8413" => "Lab Detailed Results",
        "8418" => "Lab Ordered Date",
        "8419" => "Lab Result Date",
        "8420" => "Lab Status",
        "8421" => "Lab Priority",
        "8422" => "Lab Notes",
        "8423" => "Lab Verification Date",
        "8424" => "Lab Verified By",
        "6330" => "Procedure Header",
        "6331" => "Procedure Date",
        "6333" => "Procedure Name",
        "6334" => "Procedure Result/Notes",
        "6335" => "Procedure Notes",
        "6300" => "Clinical Note Header",
        "6301" => "Visit Date",
        "6302" => "Visit Time",
        "6303" => "Reason for Visit",
        "6304" => "Review of Systems",
        "6305" => "History of Present Illness",
        "6306" => "Chief Complaint",
        "6307" => "Physical Exam",
        "6308" => "Diagnosis",
        "6309" => "Treatment Plan",
        "6310" => "Visit Summary",
        "6313" => "Free Text",
        "6315" => "Patient Summary Header",
        "6316" => "Patient Summary Entry",
        _ => return None,
    };
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_has_a_label() {
        let all = [
            BDT_VERSION, SOFTWARE_ID, RECORD_TYPE, PATIENT_ID, LAST_NAME, FIRST_NAME, ADDRESS,
            INSURANCE, DATE_OF_BIRTH, GENDER, PHONE, EMAIL, PATIENT_NUMBER, BLOOD_TYPE,
            EMERGENCY_CONTACT, SYSTOLIC, DIASTOLIC, HEART_RATE, TEMPERATURE, WEIGHT, HEIGHT,
            ALLERGY_HEADER, ALLERGY_SUBSTANCE, ALLERGY_SEVERITY, ALLERGY_REACTION,
            DIAGNOSIS_HEADER, DIAGNOSIS_CODE, DIAGNOSIS_TEXT, DIAGNOSIS_STATUS,
            MEDICATION_HEADER, MEDICATION_NAME, MEDICATION_DOSAGE, MEDICATION_START_DATE,
            MEDICATION_STATUS, MEDICATION_INSTRUCTIONS, LAB_HEADER, LAB_TEST_NAME, LAB_RESULT,
            LAB_DETAILS, LAB_ORDERED_DATE, LAB_RESULT_DATE, LAB_STATUS, LAB_PRIORITY, LAB_NOTES,
            LAB_VERIFIED_DATE, LAB_VERIFIED_BY, PROCEDURE_HEADER, PROCEDURE_DATE,
            PROCEDURE_NAME, PROCEDURE_RESULT, PROCEDURE_NOTES, CLINICAL_NOTE_HEADER, VISIT_DATE,
            VISIT_TIME, REASON_FOR_VISIT, REVIEW_OF_SYSTEMS, HISTORY_OF_PRESENT_ILLNESS,
            CHIEF_COMPLAINT, PHYSICAL_EXAM, VISIT_DIAGNOSIS, TREATMENT_PLAN, VISIT_SUMMARY,
            FREE_TEXT, PATIENT_SUMMARY_HEADER, PATIENT_SUMMARY_ENTRY,
        ];
        for tag in all {
            assert!(label(tag.as_str()).is_some(), "tag {tag} has no label");
        }
        assert!(label("9999").is_none());
    }

    #[test]
    fn test_tag_profiles() {
        let legacy = TagProfile::legacy();
        assert_eq!(legacy.reason_for_visit, REVIEW_OF_SYSTEMS);
        assert_eq!(legacy.radiology_notes, PROCEDURE_RESULT);

        let distinct = TagProfile::from_flag(true);
        assert_ne!(distinct.reason_for_visit, REVIEW_OF_SYSTEMS);
        assert_ne!(distinct.radiology_notes, PROCEDURE_RESULT);
        assert_eq!(TagProfile::default(), legacy);
    }
}
