// file: src/pve/mod.rs
// version: 1.0.0
// guid: e1118f1b-de45-462e-b5da-cfeedf4b6904

//! Proxmox VE host integration: storage inventory, VM registry and the
//! `qm` provisioning sequence

pub mod provisioner;
pub mod registry;
pub mod storage;

pub use provisioner::{VmDefaults, VmProvisioner};
pub use registry::VmRegistry;
pub use storage::{StorageDescriptor, StorageKind, StorageRecord, StorageResolver};
