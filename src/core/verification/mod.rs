//! Post-write verification of exported BDT files
//!
//! - [`checksum`] - SHA-256 of the encoded document
//! - [`verify`] - re-reads a written file and checks it line by line
//! - [`report`] - findings

pub mod checksum;
pub mod report;
pub mod verify;

pub use report::{VerificationFailure, VerificationReport};
pub use verify::Verifier;
