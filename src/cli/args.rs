// file: src/cli/args.rs
// version: 2.0.0
// guid: 6440fcf9-2370-47d7-8302-9fbd811a52a3

//! Command line argument definitions

use crate::pve::registry::DEFAULT_VM_CONFIG_DIR;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pve-cloud-templates")]
#[command(about = "Import cloud images into Proxmox VE as VM templates")]
#[command(
    after_help = "If [VM_NAME] is given, only the template with that name is imported."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Proxmox storage that receives the template disks
    pub storage: String,

    /// Only import the template with this name
    pub vm_name: Option<String>,

    #[arg(long, env = "PVE_TEMPLATES_CONFIG", default_value = "templates.yaml")]
    pub config: PathBuf,

    #[arg(long, env = "PVE_TEMPLATES_WORK_DIR", default_value = "./cloud_img")]
    pub work_dir: PathBuf,

    #[arg(long, env = "PVE_VM_CONFIG_DIR", default_value = DEFAULT_VM_CONFIG_DIR)]
    pub vm_config_dir: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_positional_arguments() {
        let cli = Cli::try_parse_from(["pve-cloud-templates", "local-zfs", "debian12"]).unwrap();
        assert_eq!(cli.storage, "local-zfs");
        assert_eq!(cli.vm_name.as_deref(), Some("debian12"));
        assert_eq!(cli.config, PathBuf::from("templates.yaml"));
        assert_eq!(cli.work_dir, PathBuf::from("./cloud_img"));
    }

    #[test]
    fn test_storage_is_required() {
        let err = Cli::try_parse_from(["pve-cloud-templates"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "pve-cloud-templates",
            "local",
            "--config",
            "/etc/templates.yaml",
            "--vm-config-dir",
            "/tmp/qemu-server",
            "-v",
        ])
        .unwrap();
        assert!(cli.vm_name.is_none());
        assert_eq!(cli.config, PathBuf::from("/etc/templates.yaml"));
        assert_eq!(cli.vm_config_dir, PathBuf::from("/tmp/qemu-server"));
        assert!(cli.verbose);
    }
}
