//! File header: version, software id, record type, patient id

use super::{GeneratorSettings, Section, SectionKind, SectionWriter};
use crate::core::bdt::tags;
use crate::domain::PatientId;

/// Record type written to 8316
pub const RECORD_TYPE_PATIENT: &str = "Patient";

/// One line per header field
///
/// Four lines, unless the split policy breaks an overlong patient id into
/// several 8100 lines.
pub fn build(patient_id: &PatientId, settings: &GeneratorSettings) -> Section {
    let mut writer = SectionWriter::new(settings);
    writer.push(tags::BDT_VERSION, &settings.bdt_version);
    writer.push(tags::SOFTWARE_ID, &settings.software_id);
    writer.push(tags::RECORD_TYPE, RECORD_TYPE_PATIENT);
    writer.push(tags::PATIENT_ID, patient_id.as_str());
    writer.finish(SectionKind::Header)
}
