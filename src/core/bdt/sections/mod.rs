//! Section builders
//!
//! One builder per chart section. Builders never fail: a missing optional
//! value omits its line, a malformed entry is skipped, and synonym key lists
//! are tried in order with the first non-blank value winning.
//!
//! Builders run in the order listed in [`SectionKind::ALL`].

pub mod allergies;
pub mod conditions;
pub mod demographics;
pub mod header;
pub mod labs;
pub mod medications;
pub mod radiology;
pub mod summary;
pub mod visits;

use super::field::{EncodedLine, FieldEncoder, FieldTag, OverflowPolicy};
use super::tags::TagProfile;
use crate::core::normalize::{condense, format_date, value_text};
use crate::domain::Record;
use std::fmt;

/// Default value of the 8000 field
pub const DEFAULT_BDT_VERSION: &str = "3.1.0";

/// Default value of the 9206 field
pub const DEFAULT_SOFTWARE_ID: &str = "YourEHRSystem";

/// Everything the builders need besides the chart itself
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub encoder: FieldEncoder,
    pub tags: TagProfile,
    pub bdt_version: String,
    pub software_id: String,
}

impl GeneratorSettings {
    pub fn new(overflow: OverflowPolicy, tags: TagProfile) -> Self {
        Self {
            encoder: FieldEncoder::new(overflow),
            tags,
            ..Self::default()
        }
    }

    pub fn with_identity(
        mut self,
        bdt_version: impl Into<String>,
        software_id: impl Into<String>,
    ) -> Self {
        self.bdt_version = bdt_version.into();
        self.software_id = software_id.into();
        self
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            encoder: FieldEncoder::default(),
            tags: TagProfile::default(),
            bdt_version: DEFAULT_BDT_VERSION.to_string(),
            software_id: DEFAULT_SOFTWARE_ID.to_string(),
        }
    }
}

/// The sections of a document, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Header,
    Demographics,
    Allergies,
    ChronicConditions,
    Medications,
    LabOrders,
    RadiologyOrders,
    Visits,
    Summary,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Header,
        SectionKind::Demographics,
        SectionKind::Allergies,
        SectionKind::ChronicConditions,
        SectionKind::Medications,
        SectionKind::LabOrders,
        SectionKind::RadiologyOrders,
        SectionKind::Visits,
        SectionKind::Summary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Demographics => "demographics",
            SectionKind::Allergies => "allergies",
            SectionKind::ChronicConditions => "chronic_conditions",
            SectionKind::Medications => "medications",
            SectionKind::LabOrders => "lab_orders",
            SectionKind::RadiologyOrders => "radiology_orders",
            SectionKind::Visits => "visits",
            SectionKind::Summary => "summary",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The encoded lines of one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    kind: SectionKind,
    lines: Vec<EncodedLine>,
}

impl Section {
    pub fn new(kind: SectionKind, lines: Vec<EncodedLine>) -> Self {
        Self { kind, lines }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn lines(&self) -> &[EncodedLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rendered lines, mostly for assertions and diagnostics
    pub fn rendered(&self) -> Vec<String> {
        self.lines.iter().map(EncodedLine::render).collect()
    }
}

/// Accumulates the lines of one section
pub(crate) struct SectionWriter {
    encoder: FieldEncoder,
    lines: Vec<EncodedLine>,
}

impl SectionWriter {
    pub(crate) fn new(settings: &GeneratorSettings) -> Self {
        Self {
            encoder: settings.encoder,
            lines: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, tag: FieldTag, content: impl AsRef<str>) {
        self.lines.extend(self.encoder.encode(tag, content.as_ref()));
    }

    /// Pushes only when `content` is present
    pub(crate) fn push_some(&mut self, tag: FieldTag, content: Option<impl AsRef<str>>) {
        if let Some(content) = content {
            self.push(tag, content);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub(crate) fn finish(self, kind: SectionKind) -> Section {
        Section::new(kind, self.lines)
    }
}

/// First non-blank value under `keys` as trimmed text
pub(crate) fn text_field(record: &Record<'_>, keys: &[&str]) -> Option<String> {
    record
        .first(keys)
        .map(|value| value_text(value).trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Like [`text_field`], with internal whitespace collapsed
pub(crate) fn condensed_field(record: &Record<'_>, keys: &[&str]) -> Option<String> {
    record
        .first(keys)
        .map(|value| condense(&value_text(value)))
        .filter(|text| !text.is_empty())
}

/// First non-blank value under `keys` rendered as `DDMMYYYY`
///
/// `None` when the key is missing or the value is not a date.
pub(crate) fn date_field(record: &Record<'_>, keys: &[&str]) -> Option<String> {
    record.first(keys).and_then(format_date)
}
