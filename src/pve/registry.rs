// file: src/pve/registry.rs
// version: 1.0.0
// guid: 61d903c9-2cc6-47ac-bca8-452051e2d61c

//! Lookup of existing VM definitions

use crate::Result;
use std::path::{Path, PathBuf};

/// Where the cluster filesystem keeps QEMU VM definitions
pub const DEFAULT_VM_CONFIG_DIR: &str = "/etc/pve/qemu-server";

/// VM definitions on the host, one `<vmid>.conf` file each
#[derive(Debug, Clone)]
pub struct VmRegistry {
    config_dir: PathBuf,
}

impl VmRegistry {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the definition file for `vmid`
    pub fn config_path(&self, vmid: u32) -> PathBuf {
        self.config_dir.join(format!("{}.conf", vmid))
    }

    /// Whether a VM with `vmid` is already defined
    pub async fn exists(&self, vmid: u32) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.config_path(vmid)).await?)
    }
}

impl Default for VmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_VM_CONFIG_DIR)
    }
}
