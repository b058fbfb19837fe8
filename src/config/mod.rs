// file: src/config/mod.rs
// version: 2.0.0
// guid: 2cb3e333-084b-4279-9e60-1586b159acd9

//! Configuration module for the template importer
//!
//! Handles loading and validation of the declarative template list.

pub mod loader;
pub mod template;

pub use loader::ConfigLoader;
pub use template::{CustomizeSpec, TemplateList, TemplateSpec};
