//! Document assembly
//!
//! Runs the section builders in their fixed order and joins the result into
//! one CP1252 byte stream: every line, including the last, ends in CRLF.

use super::encoding::encode;
use super::field::EncodedLine;
use super::sections::{
    allergies, conditions, demographics, header, labs, medications, radiology, summary, visits,
    GeneratorSettings, Section, SectionKind,
};
use crate::core::normalize::resolve_array;
use crate::core::verification::checksum::calculate_checksum_bytes;
use crate::domain::{PatientChart, PatientId};
use serde::Serialize;
use serde_json::Value;

/// Line terminator between and after lines
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Sizes of the chart collections that fed the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub visits: usize,
    pub prescriptions: usize,
    pub lab_orders: usize,
    pub radiology_orders: usize,
}

/// Collections resolved from wherever the chart keeps them
struct ChartCollections {
    prescriptions: Vec<Value>,
    lab_orders: Vec<Value>,
    radiology_orders: Vec<Value>,
    visits: Vec<Value>,
}

impl ChartCollections {
    /// Root-level keys win over the copies nested under `patient`
    fn resolve(chart: &PatientChart) -> Self {
        let root = chart.root();
        let patient = chart.patient();

        let prescriptions = resolve_array(&[
            root.get("prescriptions"),
            patient.get("prescriptions"),
            patient.get("medications"),
        ]);

        Self {
            prescriptions: medications::normalize_prescriptions(prescriptions),
            lab_orders: resolve_array(&[root.get("labOrders"), patient.get("labOrders")]),
            radiology_orders: resolve_array(&[
                root.get("radiologyOrders"),
                patient.get("radiologyOrders"),
            ]),
            visits: resolve_array(&[root.get("visits"), patient.get("visits")]),
        }
    }

    fn stats(&self) -> CollectionStats {
        CollectionStats {
            visits: self.visits.len(),
            prescriptions: self.prescriptions.len(),
            lab_orders: self.lab_orders.len(),
            radiology_orders: self.radiology_orders.len(),
        }
    }
}

/// A complete BDT document for one patient
#[derive(Debug, Clone)]
pub struct BdtDocument {
    patient_id: PatientId,
    sections: Vec<Section>,
    stats: CollectionStats,
}

impl BdtDocument {
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    /// Sections in output order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|section| section.kind() == kind)
    }

    pub fn stats(&self) -> CollectionStats {
        self.stats
    }

    /// Every line of the document in order
    pub fn lines(&self) -> impl Iterator<Item = &EncodedLine> {
        self.sections.iter().flat_map(|section| section.lines())
    }

    pub fn line_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Line count per section, in output order
    pub fn section_counts(&self) -> Vec<(SectionKind, usize)> {
        self.sections
            .iter()
            .map(|section| (section.kind(), section.len()))
            .collect()
    }

    /// The document as text, CRLF terminated
    pub fn to_text(&self) -> String {
        self.lines().fold(String::new(), |mut text, line| {
            text.push_str(&line.render());
            text.push_str("\r\n");
            text
        })
    }

    /// The document as CP1252 bytes, ready to be written
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.to_text())
    }

    /// SHA-256 of [`to_bytes`](Self::to_bytes), hex encoded
    pub fn checksum(&self) -> String {
        calculate_checksum_bytes(&self.to_bytes())
    }
}

/// Builds the document for `chart`
///
/// Never fails; every shape problem in the chart is absorbed by the
/// builders.
///
/// # Examples
///
/// ```
/// use bdt_export::core::bdt::{build_document, GeneratorSettings};
/// use bdt_export::domain::PatientChart;
/// use serde_json::json;
///
/// let chart = PatientChart::from_value(json!({"patient": {"id": 1}})).unwrap();
/// let document = build_document(&chart, &GeneratorSettings::default());
/// assert!(document.to_bytes().ends_with(b"\r\n"));
/// ```
pub fn build_document(chart: &PatientChart, settings: &GeneratorSettings) -> BdtDocument {
    let patient = chart.patient();
    let collections = ChartCollections::resolve(chart);

    let sections = vec![
        header::build(chart.patient_id(), settings),
        demographics::build(&patient, chart.patient_id(), settings),
        allergies::build(&patient, settings),
        conditions::build(&patient, settings),
        medications::build(&collections.prescriptions, settings),
        labs::build(&collections.lab_orders, settings),
        radiology::build(&collections.radiology_orders, settings),
        visits::build(&collections.visits, settings),
        summary::build(&collections.visits, settings),
    ];

    for section in &sections {
        tracing::debug!(
            patient_id = %chart.patient_id(),
            section = %section.kind(),
            lines = section.len(),
            "Section built"
        );
    }

    BdtDocument {
        patient_id: chart.patient_id().clone(),
        sections,
        stats: collections.stats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart(value: Value) -> PatientChart {
        PatientChart::from_value(value).unwrap()
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let document = build_document(&chart(json!({"patient": {"id": 1}})), &GeneratorSettings::default());
        let kinds: Vec<SectionKind> = document.sections().iter().map(Section::kind).collect();
        assert_eq!(kinds, SectionKind::ALL.to_vec());
    }

    #[test]
    fn test_collections_prefer_root_level() {
        let document = build_document(
            &chart(json!({
                "patient": {
                    "id": 1,
                    "prescriptions": ["Nested"],
                    "visits": [{}, {}]
                },
                "prescriptions": ["Root"],
                "labOrders": {"records": [{"testName": "CRP"}]}
            })),
            &GeneratorSettings::default(),
        );

        let medications = document.section(SectionKind::Medications).unwrap();
        assert!(medications.rendered().contains(&"0116221Root".to_string()));
        assert_eq!(
            document.stats(),
            CollectionStats {
                visits: 2,
                prescriptions: 1,
                lab_orders: 1,
                radiology_orders: 0,
            }
        );
    }

    #[test]
    fn test_patient_medications_fallback() {
        let document = build_document(
            &chart(json!({"patient": {"id": 1, "medications": "[\"Aspirin\"]"}})),
            &GeneratorSettings::default(),
        );
        let medications = document.section(SectionKind::Medications).unwrap();
        assert!(medications.rendered().contains(&"0146221Aspirin".to_string()));
    }

    #[test]
    fn test_bytes_are_crlf_terminated() {
        let document = build_document(&chart(json!({"patient": {"id": 1}})), &GeneratorSettings::default());
        let bytes = document.to_bytes();
        assert!(bytes.ends_with(b"\r\n"));
        assert!(!bytes.ends_with(b"\r\n\r\n"));

        let terminators = bytes.windows(2).filter(|pair| *pair == LINE_TERMINATOR).count();
        assert_eq!(terminators, document.line_count());
        assert_eq!(document.checksum().len(), 64);
    }
}
