// file: src/lib.rs
// version: 2.0.0
// guid: 3c5d81b2-6a0e-4f7c-9b14-d2e8a0f6c915

//! # pve-cloud-templates
//!
//! Imports cloud VM disk images into a Proxmox VE host as reusable VM
//! templates. Each template from a declarative YAML list is downloaded,
//! optionally unpacked and customized with virt-customize, imported as a
//! VM with `qm`, attached to the chosen storage and converted into a
//! template.

pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod image;
pub mod importer;
pub mod logging;
pub mod network;
pub mod pve;
pub mod utils;

pub use error::{ImportError, Result};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
