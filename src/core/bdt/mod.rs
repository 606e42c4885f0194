//! BDT record generation
//!
//! Turns a [`PatientChart`](crate::domain::PatientChart) into a BDT
//! (Behandlungsdatentransfer) document:
//!
//! - [`encoding`] - CP1252 byte encoding
//! - [`field`] - `LLL` + `TTTT` + content line encoding
//! - [`tags`] - the field tag vocabulary
//! - [`sections`] - one builder per chart section
//! - [`assembler`] - fixed-order assembly into a document
//! - [`inspect`] - reading a document back for checks and display

pub mod assembler;
pub mod encoding;
pub mod field;
pub mod inspect;
pub mod sections;
pub mod tags;

pub use assembler::{build_document, BdtDocument, CollectionStats};
pub use field::{EncodedLine, FieldEncoder, FieldTag, OverflowPolicy};
pub use inspect::{inspect_bytes, InspectionReport, LineIssue};
pub use sections::{GeneratorSettings, Section, SectionKind};
pub use tags::TagProfile;
