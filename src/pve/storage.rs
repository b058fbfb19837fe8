// file: src/pve/storage.rs
// version: 1.0.0
// guid: 94211189-03fd-47f1-bf27-2c0006d0305c

//! Storage inventory lookup and disk naming

use crate::error::ImportError;
use crate::exec::{CommandRunner, HostCommand};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Content type a storage must advertise to hold VM disks
pub const IMAGES_CONTENT: &str = "images";

/// How a storage backend addresses VM disks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Disks are files below a per-VM directory
    File,
    /// Disks are raw volumes (zvols, logical volumes)
    Raw,
}

/// Known backend types. New backends are added here, never inferred.
const BACKEND_KINDS: &[(&str, StorageKind)] = &[
    ("dir", StorageKind::File),
    ("nfs", StorageKind::File),
    ("glusterfs", StorageKind::File),
    ("zfspool", StorageKind::Raw),
    ("lvm", StorageKind::Raw),
    ("lvmthin", StorageKind::Raw),
];

impl StorageKind {
    /// Classify a backend type string
    pub fn from_backend_type(backend: &str) -> Option<Self> {
        BACKEND_KINDS
            .iter()
            .find(|(name, _)| *name == backend)
            .map(|(_, kind)| *kind)
    }

    /// Name of the first imported disk of `vmid` on this kind of storage
    pub fn disk_name(&self, vmid: u32) -> String {
        match self {
            StorageKind::File => format!("{vmid}/vm-{vmid}-disk-0.qcow2"),
            StorageKind::Raw => format!("vm-{vmid}-disk-0"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::File => "file",
            StorageKind::Raw => "raw",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of `pvesh get /storage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRecord {
    pub storage: String,
    /// Comma separated content types
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub backend: String,
}

impl StorageRecord {
    pub fn supports_images(&self) -> bool {
        self.content.split(',').any(|c| c.trim() == IMAGES_CONTENT)
    }
}

/// A storage resolved for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDescriptor {
    pub name: String,
    pub kind: StorageKind,
}

impl StorageDescriptor {
    /// Find and classify `name` among `records`
    pub fn classify(records: &[StorageRecord], name: &str) -> Result<Self> {
        let record = records
            .iter()
            .find(|r| r.storage == name)
            .ok_or_else(|| ImportError::storage(format!("PVE storage {} does not exist.", name)))?;

        if !record.supports_images() {
            return Err(ImportError::storage(format!(
                "PVE storage {} does not support VM images.",
                name
            )));
        }

        let kind = StorageKind::from_backend_type(&record.backend).ok_or_else(|| {
            ImportError::storage(format!("Unsupported PVE storage type {}.", record.backend))
        })?;

        Ok(Self {
            name: name.to_string(),
            kind,
        })
    }

    /// Volume id of the imported disk, e.g. `local:9000/vm-9000-disk-0.qcow2`
    pub fn disk_volume(&self, vmid: u32) -> String {
        format!("{}:{}", self.name, self.kind.disk_name(vmid))
    }

    /// Volume id for a cloud-init drive on this storage
    pub fn cloudinit_volume(&self) -> String {
        format!("{}:cloudinit", self.name)
    }
}

/// Queries the host storage inventory
#[derive(Debug, Default)]
pub struct StorageResolver;

impl StorageResolver {
    pub fn new() -> Self {
        Self
    }

    fn list_command() -> HostCommand {
        HostCommand::new("pvesh").args(["get", "/storage", "--output-format=json"])
    }

    /// List all storages known to the host
    pub async fn list<R: CommandRunner>(&self, runner: &mut R) -> Result<Vec<StorageRecord>> {
        let command = Self::list_command();
        let output = runner.capture(&command).await?;
        if !output.is_success() {
            return Err(ImportError::storage(format!(
                "`{}` failed (exit code {:?}): {}",
                command,
                output.exit_code,
                output.stderr.trim()
            )));
        }

        let records: Vec<StorageRecord> = serde_json::from_str(&output.stdout)?;
        debug!("Host reports {} storages", records.len());
        Ok(records)
    }

    /// Resolve `name` into a descriptor usable for every template of the run
    pub async fn resolve<R: CommandRunner>(&self, runner: &mut R, name: &str) -> Result<StorageDescriptor> {
        let records = self.list(runner).await?;
        let descriptor = StorageDescriptor::classify(&records, name)?;
        info!("Using storage {} ({} disks)", descriptor.name, descriptor.kind);
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::RecordingRunner;
    use crate::exec::CommandOutput;

    fn record(name: &str, content: &str, backend: &str) -> StorageRecord {
        StorageRecord {
            storage: name.to_string(),
            content: content.to_string(),
            backend: backend.to_string(),
        }
    }

    #[test]
    fn test_file_backends() {
        for backend in ["dir", "nfs", "glusterfs"] {
            let records = vec![record("s", "iso,images", backend)];
            let desc = StorageDescriptor::classify(&records, "s").unwrap();
            assert_eq!(desc.kind, StorageKind::File, "{backend}");
        }
    }

    #[test]
    fn test_raw_backends() {
        for backend in ["zfspool", "lvm", "lvmthin"] {
            let records = vec![record("s", "images,rootdir", backend)];
            let desc = StorageDescriptor::classify(&records, "s").unwrap();
            assert_eq!(desc.kind, StorageKind::Raw, "{backend}");
        }
    }

    #[test]
    fn test_unknown_backend_rejected() {
        for backend in ["rbd", "cifs", "pbs", "iscsi", ""] {
            let records = vec![record("s", "images", backend)];
            let err = StorageDescriptor::classify(&records, "s").unwrap_err();
            assert!(matches!(err, ImportError::StorageError(_)));
            assert!(err.to_string().contains("Unsupported"));
        }
    }

    #[test]
    fn test_missing_storage() {
        let records = vec![record("local", "images", "dir")];
        let err = StorageDescriptor::classify(&records, "tank").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_storage_without_images_content() {
        let records = vec![record("local", "iso,vztmpl,backup", "dir")];
        let err = StorageDescriptor::classify(&records, "local").unwrap_err();
        assert!(err.to_string().contains("does not support VM images"));
    }

    #[test]
    fn test_disk_names() {
        assert_eq!(StorageKind::File.disk_name(9000), "9000/vm-9000-disk-0.qcow2");
        assert_eq!(StorageKind::Raw.disk_name(9000), "vm-9000-disk-0");

        let desc = StorageDescriptor {
            name: "local-zfs".to_string(),
            kind: StorageKind::Raw,
        };
        assert_eq!(desc.disk_volume(123), "local-zfs:vm-123-disk-0");
        assert_eq!(desc.cloudinit_volume(), "local-zfs:cloudinit");
    }

    #[tokio::test]
    async fn test_resolve_parses_pvesh_output() {
        let mut runner = RecordingRunner::new();
        runner.respond(
            "pvesh get /storage",
            CommandOutput::success(
                r#"[
                    {"storage":"local","content":"iso,vztmpl,backup","type":"dir","path":"/var/lib/vz","digest":"abc"},
                    {"storage":"local-lvm","content":"rootdir,images","type":"lvmthin","thinpool":"data","vgname":"pve"}
                ]"#,
            ),
        );

        let desc = StorageResolver::new().resolve(&mut runner, "local-lvm").await.unwrap();
        assert_eq!(desc.kind, StorageKind::Raw);
        assert_eq!(runner.rendered(), vec!["pvesh get /storage --output-format=json"]);
    }

    #[tokio::test]
    async fn test_resolve_pvesh_failure_is_storage_error() {
        let mut runner = RecordingRunner::new();
        runner.respond("pvesh", CommandOutput::failure(255, "ipcc_send_rec failed"));

        let err = StorageResolver::new().resolve(&mut runner, "local").await.unwrap_err();
        assert!(matches!(err, ImportError::StorageError(_)));
    }

    #[tokio::test]
    async fn test_resolve_record_without_content() {
        let mut runner = RecordingRunner::new();
        runner.respond(
            "pvesh",
            CommandOutput::success(r#"[{"storage":"pbs","type":"pbs"}]"#),
        );

        let err = StorageResolver::new().resolve(&mut runner, "pbs").await.unwrap_err();
        assert!(err.to_string().contains("does not support VM images"));
    }
}
