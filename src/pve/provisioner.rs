// file: src/pve/provisioner.rs
// version: 1.0.0
// guid: 76be3db9-2b67-4daf-819d-2b9db6078190

//! Turns a prepared disk image into a VM template with `qm`

use super::StorageDescriptor;
use crate::config::TemplateSpec;
use crate::exec::{CommandRunner, HostCommand};
use crate::Result;
use std::path::Path;
use tracing::{error, info};

/// Fixed settings of every created VM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmDefaults {
    pub memory_mb: u32,
    pub net0: String,
    pub scsi_hw: String,
    pub disk_slot: String,
    pub cloudinit_slot: String,
    pub ci_user: String,
    pub import_format: String,
}

impl Default for VmDefaults {
    fn default() -> Self {
        Self {
            memory_mb: 512,
            net0: "virtio,bridge=vmbr0".to_string(),
            scsi_hw: "virtio-scsi-pci".to_string(),
            disk_slot: "scsi0".to_string(),
            cloudinit_slot: "ide2".to_string(),
            ci_user: "root".to_string(),
            import_format: "qcow2".to_string(),
        }
    }
}

/// Issues the `qm` command sequence for one template
#[derive(Debug, Clone, Default)]
pub struct VmProvisioner {
    defaults: VmDefaults,
}

impl VmProvisioner {
    pub fn new(defaults: VmDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &VmDefaults {
        &self.defaults
    }

    fn qm(vmid: u32, sub: &str) -> HostCommand {
        HostCommand::new("qm").arg(sub).arg(vmid.to_string())
    }

    /// Commands that create, configure and templatize the VM, in order
    pub fn plan(&self, template: &TemplateSpec, image: &Path, storage: &StorageDescriptor) -> Vec<HostCommand> {
        let d = &self.defaults;
        let vmid = template.vmid;

        let mut commands = vec![
            Self::qm(vmid, "create").args([
                "--name".to_string(),
                template.name.clone(),
                "--memory".to_string(),
                d.memory_mb.to_string(),
                "--net0".to_string(),
                d.net0.clone(),
            ]),
            Self::qm(vmid, "importdisk").args([
                image.display().to_string(),
                storage.name.clone(),
                "--format".to_string(),
                d.import_format.clone(),
            ]),
            Self::qm(vmid, "set").args([
                "--scsihw".to_string(),
                d.scsi_hw.clone(),
                format!("--{}", d.disk_slot),
                storage.disk_volume(vmid),
            ]),
            Self::qm(vmid, "set").args([
                "--boot".to_string(),
                "c".to_string(),
                "--bootdisk".to_string(),
                d.disk_slot.clone(),
            ]),
            Self::qm(vmid, "set").args(["--serial0", "socket"]),
        ];

        if template.cloud_init {
            commands.push(
                Self::qm(vmid, "set").args([format!("--{}", d.cloudinit_slot), storage.cloudinit_volume()]),
            );
            commands.push(Self::qm(vmid, "set").args(["--ciuser".to_string(), d.ci_user.clone()]));
        }

        commands.push(Self::qm(vmid, "template"));
        commands
    }

    /// Run the plan, stopping at the first failing command
    ///
    /// Steps already applied are not rolled back.
    pub async fn provision<R: CommandRunner>(
        &self,
        runner: &mut R,
        template: &TemplateSpec,
        image: &Path,
        storage: &StorageDescriptor,
    ) -> Result<()> {
        for command in self.plan(template, image, storage) {
            if let Err(e) = runner.run_checked(&command).await {
                error!(
                    "VM {} may be left partially created; remove it with `qm destroy {}` before retrying",
                    template.vmid, template.vmid
                );
                return Err(e);
            }
        }

        info!("VM {} ({}) converted to template", template.vmid, template.name);
        Ok(())
    }
}
