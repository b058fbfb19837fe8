// file: src/image/mod.rs
// version: 2.0.0
// guid: a5784dfe-1ab8-4964-8fd9-7d2bf3c93d7c

//! Cloud image handling
//!
//! This module handles:
//! - Downloading images to a temporary path and unpacking them
//! - Guest customization with virt-customize
//! - Removing transient image files

pub mod customizer;
pub mod fetcher;

pub use customizer::{build_customize_args, Customizer};
pub use fetcher::{remove_partial_downloads, ImageFetcher, ImagePaths};
