// file: src/cli/mod.rs
// version: 2.0.0
// guid: 7a0cb1b8-8d31-4c56-b193-fa34c3d53d14

//! Command line interface for the template importer

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
