// file: src/image/customizer.rs
// version: 2.0.0
// guid: 49a3a709-37a6-4f16-a849-3025df346540

//! Guest customization of disk images with virt-customize
//!
//! Files are uploaded and commands run inside the image before it is
//! imported, without booting it.

use crate::config::CustomizeSpec;
use crate::exec::{CommandRunner, HostCommand};
use crate::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Guest customization tool
pub const VIRT_CUSTOMIZE: &str = "virt-customize";

/// libguestfs needs the direct backend when run as root
pub const LIBGUESTFS_BACKEND: (&str, &str) = ("LIBGUESTFS_BACKEND", "direct");

/// Build virt-customize arguments: all uploads first, then all commands,
/// each in file order
pub fn build_customize_args(customize: Option<&CustomizeSpec>) -> Vec<String> {
    let Some(customize) = customize else {
        return Vec::new();
    };

    let mut args = Vec::with_capacity(2 * (customize.uploads.len() + customize.commands.len()));

    for upload in &customize.uploads {
        args.push("--upload".to_string());
        args.push(upload.clone());
    }

    for command in &customize.commands {
        args.push("--run-command".to_string());
        args.push(command.clone());
    }

    args
}

/// Invokes virt-customize against an image
#[derive(Debug, Default)]
pub struct Customizer;

impl Customizer {
    pub fn new() -> Self {
        Self
    }

    /// The command that would customize `image`, or `None` if there is nothing to do
    pub fn command(&self, image: &Path, customize: Option<&CustomizeSpec>) -> Option<HostCommand> {
        let args = build_customize_args(customize);
        if args.is_empty() {
            return None;
        }

        Some(
            HostCommand::new(VIRT_CUSTOMIZE)
                .arg("-a")
                .arg(image.display().to_string())
                .args(args)
                .env(LIBGUESTFS_BACKEND.0, LIBGUESTFS_BACKEND.1),
        )
    }

    /// Customize `image`; returns whether the tool was invoked
    ///
    /// A non-zero exit from the tool is logged and otherwise ignored.
    pub async fn customize<R: CommandRunner>(
        &self,
        runner: &mut R,
        image: &Path,
        customize: Option<&CustomizeSpec>,
    ) -> Result<bool> {
        let Some(command) = self.command(image, customize) else {
            debug!("No customization for {}", image.display());
            return Ok(false);
        };

        let output = runner.run(&command).await?;
        if !output.is_success() {
            warn!(
                "{} exited with {:?} for {}",
                VIRT_CUSTOMIZE,
                output.exit_code,
                image.display()
            );
        }

        Ok(true)
    }
}
