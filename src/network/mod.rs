// file: src/network/mod.rs
// version: 2.0.0
// guid: 843afc3a-8f68-4cbd-823f-2472d9e375c8

//! Network operations module

pub mod download;

pub use download::{ImageSource, NetworkDownloader};
