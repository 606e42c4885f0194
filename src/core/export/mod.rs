//! Export orchestration
//!
//! - [`coordinator`] - one chart in, one BDT file out
//! - [`writer`] - atomic temp-file-and-rename writes with cancellation
//! - [`summary`] - the result of an export, for display and logging

pub mod coordinator;
pub mod summary;
pub mod writer;

pub use coordinator::{export_file_name, ExportCoordinator};
pub use summary::ExportSummary;
pub use writer::AtomicWriter;
