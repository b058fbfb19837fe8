// file: src/logging/mod.rs
// version: 2.0.0
// guid: b1cac768-4c13-40e2-b859-426288b592b5

//! Logging system for the template importer

pub mod logger;

pub use logger::init_logger;
