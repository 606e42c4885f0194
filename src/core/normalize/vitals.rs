//! Vitals normalization
//!
//! Visit vitals were stored under several naming dialects and in several
//! shapes over the life of the source system. [`normalize_vitals`] maps all
//! of them onto a fixed [`NormalizedVitals`] record plus a list of readable
//! summary fragments.

use super::{format_number, humanize_label, parse_numeric, safe_json_parse, value_text};
use crate::domain::chart::is_blank;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::LazyLock;

static BLOOD_PRESSURE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2,3})\s*[/|\-]\s*(\d{2,3})").expect("blood pressure pattern is valid")
});

const BLOOD_PRESSURE_KEYS: &[&str] = &["bloodPressure", "blood_pressure", "bp"];

/// Fixed slots of [`NormalizedVitals`] filled from a synonym group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VitalField {
    HeartRate,
    Temperature,
    Respiratory,
    Oxygen,
    Weight,
    Height,
}

/// How a synonym group renders its summary fragment
#[derive(Debug, Clone, Copy)]
enum FragmentStyle {
    /// `<label> <number><unit>`, raw text if not numeric
    Measured,
    /// Raw trimmed string if one was given, else `<label> <number><unit>`
    RawPreferred,
}

struct VitalGroup {
    keys: &'static [&'static str],
    field: VitalField,
    label: &'static str,
    unit: &'static str,
    style: FragmentStyle,
}

const VITAL_GROUPS: &[VitalGroup] = &[
    VitalGroup {
        keys: &["heartRate", "heart_rate", "pulse"],
        field: VitalField::HeartRate,
        label: "Heart Rate",
        unit: " bpm",
        style: FragmentStyle::Measured,
    },
    VitalGroup {
        keys: &["temperature", "temp"],
        field: VitalField::Temperature,
        label: "Temperature",
        unit: " °C",
        style: FragmentStyle::Measured,
    },
    VitalGroup {
        keys: &["respiratory", "respiratoryRate", "respiration"],
        field: VitalField::Respiratory,
        label: "Resp Rate",
        unit: " breaths/min",
        style: FragmentStyle::Measured,
    },
    VitalGroup {
        keys: &["oxygenSaturation", "oxygen", "spo2"],
        field: VitalField::Oxygen,
        label: "SpO2",
        unit: "%",
        style: FragmentStyle::Measured,
    },
    VitalGroup {
        keys: &["weight", "weightKg", "weight_kg"],
        field: VitalField::Weight,
        label: "Weight",
        unit: " kg",
        style: FragmentStyle::RawPreferred,
    },
    VitalGroup {
        keys: &["height", "heightCm", "height_cm"],
        field: VitalField::Height,
        label: "Height",
        unit: " cm",
        style: FragmentStyle::RawPreferred,
    },
];

/// Vitals reduced to fixed numeric fields and readable fragments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedVitals {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub heart_rate: Option<f64>,
    pub temperature: Option<f64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub respiratory: Option<f64>,
    pub oxygen: Option<f64>,
    /// Human-readable fragments, unique and in input order
    pub summary_parts: Vec<String>,
}

impl NormalizedVitals {
    fn set(&mut self, field: VitalField, value: f64) {
        let slot = match field {
            VitalField::HeartRate => &mut self.heart_rate,
            VitalField::Temperature => &mut self.temperature,
            VitalField::Respiratory => &mut self.respiratory,
            VitalField::Oxygen => &mut self.oxygen,
            VitalField::Weight => &mut self.weight,
            VitalField::Height => &mut self.height,
        };
        *slot = Some(value);
    }

    fn push_fragment(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.trim().is_empty() {
            self.summary_parts.push(fragment);
        }
    }

    fn dedup_fragments(&mut self) {
        let mut seen = HashSet::new();
        self.summary_parts.retain(|part| seen.insert(part.clone()));
    }
}

/// The shapes vitals arrive in
#[derive(Debug, Clone)]
pub enum VitalsInput<'a> {
    /// No vitals recorded
    Absent,
    /// A plain key/value object
    Object(&'a Map<String, Value>),
    /// Partial objects to be merged, later entries win
    ArrayOfObjects(&'a [Value]),
    /// Text, possibly holding embedded JSON
    String(&'a str),
    /// Any other scalar
    Scalar(&'a Value),
}

impl<'a> VitalsInput<'a> {
    /// Classifies a raw chart value
    pub fn classify(raw: Option<&'a Value>) -> Self {
        match raw {
            None | Some(Value::Null) | Some(Value::Bool(false)) => VitalsInput::Absent,
            Some(Value::Object(map)) => VitalsInput::Object(map),
            Some(Value::Array(entries)) => VitalsInput::ArrayOfObjects(entries),
            Some(Value::String(text)) => VitalsInput::String(text),
            Some(other) => VitalsInput::Scalar(other),
        }
    }
}

/// Normalizes raw vitals of any shape
///
/// # Examples
///
/// ```
/// use bdt_export::core::normalize::normalize_vitals;
/// use serde_json::json;
///
/// let vitals = normalize_vitals(Some(&json!({"bloodPressure": "120/80", "pulse": "70"})));
/// assert_eq!(vitals.systolic, Some(120.0));
/// assert_eq!(vitals.diastolic, Some(80.0));
/// assert_eq!(vitals.heart_rate, Some(70.0));
/// assert_eq!(vitals.summary_parts, vec!["BP 120/80 mmHg", "Heart Rate 70 bpm"]);
/// ```
pub fn normalize_vitals(raw: Option<&Value>) -> NormalizedVitals {
    let mut normalized = match VitalsInput::classify(raw) {
        VitalsInput::Absent => NormalizedVitals::default(),
        VitalsInput::Object(map) => normalize_object(map),
        VitalsInput::ArrayOfObjects(entries) => {
            let mut merged = Map::new();
            let mut loose = Vec::new();
            for entry in entries {
                match entry {
                    Value::Object(map) => {
                        for (key, value) in map {
                            merged.insert(key.clone(), value.clone());
                        }
                    }
                    other if !is_blank(other) => loose.push(value_text(other).trim().to_string()),
                    _ => {}
                }
            }
            let mut normalized = normalize_object(&merged);
            for text in loose {
                normalized.push_fragment(text);
            }
            normalized
        }
        VitalsInput::String(text) => match safe_json_parse(text) {
            Some(parsed @ (Value::Object(_) | Value::Array(_))) => {
                return normalize_vitals(Some(&parsed));
            }
            _ => {
                let mut normalized = NormalizedVitals::default();
                normalized.push_fragment(text.trim());
                normalized
            }
        },
        VitalsInput::Scalar(value) => {
            let mut normalized = NormalizedVitals::default();
            normalized.push_fragment(value_text(value).trim());
            normalized
        }
    };

    normalized.dedup_fragments();
    normalized
}

fn first_present<'m>(map: &'m Map<String, Value>, keys: &[&str]) -> Option<&'m Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !is_blank(value))
}

fn normalize_object(map: &Map<String, Value>) -> NormalizedVitals {
    let mut normalized = NormalizedVitals::default();
    let mut handled: HashSet<&str> = HashSet::new();

    if let Some(raw) = first_present(map, BLOOD_PRESSURE_KEYS) {
        handled.extend(BLOOD_PRESSURE_KEYS);
        apply_blood_pressure(&mut normalized, raw);
    }

    for group in VITAL_GROUPS {
        let Some(raw) = first_present(map, group.keys) else {
            continue;
        };
        handled.extend(group.keys);

        let parsed = parse_numeric(raw);
        if let Some(value) = parsed {
            normalized.set(group.field, value);
        }

        let raw_text = value_text(raw).trim().to_string();
        let fragment = match (group.style, parsed) {
            (FragmentStyle::RawPreferred, _) if raw.is_string() => {
                format!("{} {}", group.label, raw_text)
            }
            (_, Some(value)) => format!("{} {}{}", group.label, format_number(value), group.unit),
            (_, None) => format!("{} {}", group.label, raw_text),
        };
        normalized.push_fragment(fragment);
    }

    for (key, value) in map {
        if handled.contains(key.as_str()) || is_blank(value) {
            continue;
        }
        let text = value_text(value);
        let text = text.trim();
        if !text.is_empty() {
            normalized.push_fragment(format!("{}: {}", humanize_label(key), text));
        }
    }

    normalized
}

fn apply_blood_pressure(normalized: &mut NormalizedVitals, raw: &Value) {
    let mut systolic = None;
    let mut diastolic = None;
    let mut text = String::new();

    if let Value::Object(parts) = raw {
        let systolic_raw = parts.get("systolic").filter(|v| !is_blank(v));
        let diastolic_raw = parts.get("diastolic").filter(|v| !is_blank(v));
        systolic = systolic_raw.and_then(parse_numeric);
        diastolic = diastolic_raw.and_then(parse_numeric);

        let display = |raw: Option<&Value>, parsed: Option<f64>| {
            raw.map(|v| value_text(v).trim().to_string())
                .or_else(|| parsed.map(format_number))
        };
        if let (Some(s), Some(d)) = (
            display(systolic_raw, systolic),
            display(diastolic_raw, diastolic),
        ) {
            text = format!("{s}/{d}");
        }
    } else {
        let raw_text = value_text(raw).trim().to_string();
        if let Some(caps) = BLOOD_PRESSURE_PATTERN.captures(&raw_text) {
            systolic = caps[1].parse().ok();
            diastolic = caps[2].parse().ok();
            text = format!("{}/{}", &caps[1], &caps[2]);
        } else {
            systolic = parse_numeric(raw);
            text = raw_text;
        }
    }

    normalized.systolic = systolic.or(normalized.systolic);
    normalized.diastolic = diastolic.or(normalized.diastolic);

    if text.is_empty() {
        if let (Some(s), Some(d)) = (normalized.systolic, normalized.diastolic) {
            text = format!("{}/{}", format_number(s), format_number(d));
        }
    }

    if !text.is_empty() {
        normalized.push_fragment(format!("BP {text} mmHg"));
    } else if systolic.is_none() && diastolic.is_none() {
        // Nothing derivable; keep the raw value visible.
        normalized.push_fragment(format!("BP {}", value_text(raw).trim()));
    }
}
