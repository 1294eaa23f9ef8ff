//! Orchestration of an archive import run.

pub mod importer;

pub use importer::{ImportReport, Importer, import_file};
