//! Patient chart aggregate
//!
//! The chart is assembled by the persistence layer and arrives as one JSON
//! document. Its shape drifted over time (camelCase vs snake_case keys,
//! collections at the root or nested under `patient`), so it is kept as
//! loosely-typed JSON and read through [`Record`] accessors that try an
//! ordered list of synonym keys.

use super::errors::BdtError;
use super::ids::PatientId;
use super::result::Result;
use serde_json::{Map, Value};

/// Read-only view over one JSON object of the chart
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// Wraps a JSON object map
    pub fn new(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Views `value` as a record if it is a JSON object
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    /// Returns the raw value stored under `key`
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }

    /// Returns the first value under `keys` that is not blank
    ///
    /// Keys are tried in order; `null`, `false` and whitespace-only strings
    /// count as blank.
    pub fn first(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .find(|value| !is_blank(value))
    }
}

/// Returns true for values that carry no content
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// The full chart of one patient
///
/// Construction validates the one hard requirement, a usable `patient.id`.
/// Everything else is optional and tolerated in any shape.
///
/// # Examples
///
/// ```
/// use bdt_export::domain::PatientChart;
/// use serde_json::json;
///
/// let chart = PatientChart::from_value(json!({
///     "patient": {"id": 1, "firstName": "Jane", "lastName": "Doe"},
///     "visits": []
/// })).unwrap();
/// assert_eq!(chart.patient_id().as_str(), "1");
/// ```
#[derive(Debug, Clone)]
pub struct PatientChart {
    root: Map<String, Value>,
    patient_id: PatientId,
}

impl PatientChart {
    /// Builds a chart from a parsed JSON aggregate
    ///
    /// # Errors
    ///
    /// Returns [`BdtError::InvalidChart`] if the aggregate is not an object,
    /// has no `patient` object, or the patient has no usable id.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(BdtError::InvalidChart(
                "chart must be a JSON object".to_string(),
            ));
        };

        let patient = root
            .get("patient")
            .and_then(Value::as_object)
            .ok_or_else(|| BdtError::InvalidChart("chart has no patient object".to_string()))?;

        let patient_id = patient
            .get("id")
            .map(PatientId::from_value)
            .unwrap_or_else(|| Err("Patient ID is missing".to_string()))
            .map_err(BdtError::InvalidChart)?;

        Ok(Self { root, patient_id })
    }

    /// Parses a chart from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| BdtError::InvalidChart(format!("chart is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// The validated patient identifier
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    /// The aggregate root (holds root-level collections)
    pub fn root(&self) -> Record<'_> {
        Record::new(&self.root)
    }

    /// The patient record
    pub fn patient(&self) -> Record<'_> {
        // Presence checked in from_value.
        self.root
            .get("patient")
            .and_then(Record::from_value)
            .unwrap_or_else(|| Record::new(&self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chart_requires_patient_id() {
        assert!(PatientChart::from_value(json!({"patient": {"firstName": "Jane"}})).is_err());
        assert!(PatientChart::from_value(json!({"patient": {"id": ""}})).is_err());
        assert!(PatientChart::from_value(json!({"visits": []})).is_err());
        assert!(PatientChart::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_chart_from_json_str() {
        let chart = PatientChart::from_json_str(r#"{"patient": {"id": "P7"}}"#).unwrap();
        assert_eq!(chart.patient_id().as_str(), "P7");
        assert!(PatientChart::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_record_first_skips_blank_values() {
        let value = json!({"medicationName": "  ", "drug_name": null, "item": "Ibuprofen"});
        let record = Record::from_value(&value).unwrap();

        let found = record.first(&["medicationName", "drug_name", "item"]);
        assert_eq!(found, Some(&json!("Ibuprofen")));
        assert!(record.first(&["missing"]).is_none());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("  \t")));
        assert!(is_blank(&json!(false)));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!("x")));
        assert!(!is_blank(&json!([])));
    }
}
