// file: src/utils/mod.rs
// version: 2.0.0
// guid: 1543b865-7d5c-44c8-9f08-67308d004146

//! Utility modules for system operations

pub mod system;

pub use system::SystemUtils;
