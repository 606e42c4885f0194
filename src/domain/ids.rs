//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Patient identifier newtype wrapper
///
/// Chart aggregates carry the id either as a JSON number or as a string;
/// both are stored in their textual form, which is what ends up in the
/// 8100 and 3628 fields.
///
/// # Examples
///
/// ```
/// use bdt_export::domain::ids::PatientId;
/// use std::str::FromStr;
///
/// let id = PatientId::from_str("42").unwrap();
/// assert_eq!(id.as_str(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(PatientId)` if the ID is non-blank, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Reads a patient id from a JSON value (string or number)
    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Self::new(s.as_str()),
            Value::Number(n) => Self::new(n.to_string()),
            Value::Null => Err("Patient ID is missing".to_string()),
            other => Err(format!("Patient ID must be a string or number, got: {other}")),
        }
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patient_id_valid() {
        let id = PatientId::new("  17 ").unwrap();
        assert_eq!(id.as_str(), "17");
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn test_patient_id_empty() {
        assert!(PatientId::new("").is_err());
        assert!(PatientId::new("   ").is_err());
    }

    #[test]
    fn test_patient_id_from_value() {
        assert_eq!(PatientId::from_value(&json!(1)).unwrap().as_str(), "1");
        assert_eq!(
            PatientId::from_value(&json!("P-001")).unwrap().as_str(),
            "P-001"
        );
        assert!(PatientId::from_value(&json!(null)).is_err());
        assert!(PatientId::from_value(&json!({"id": 1})).is_err());
    }
}
