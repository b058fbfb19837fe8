// file: src/utils/system.rs
// version: 2.0.0
// guid: 1bcc9d54-88a0-489d-816e-077bab887125

//! System utility functions

use crate::error::ImportError;
use crate::Result;
use tracing::debug;

/// Tools that must be on PATH before any template is touched
pub const REQUIRED_COMMANDS: &[&str] = &["virt-customize", "unzip"];

/// System utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        match which::which(command) {
            Ok(path) => {
                debug!("Found {} at {}", command, path.display());
                true
            }
            Err(_) => false,
        }
    }

    /// Commands from `required` that are not on PATH
    pub fn missing_commands(required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|cmd| !Self::command_exists(cmd))
            .map(|cmd| cmd.to_string())
            .collect()
    }

    /// Fail with a dependency error unless every required tool is available
    pub fn check_prerequisites() -> Result<()> {
        let missing = Self::missing_commands(REQUIRED_COMMANDS);
        if missing.is_empty() {
            return Ok(());
        }

        Err(ImportError::DependencyError(format!(
            "{} not found on PATH; install libguestfs-tools and unzip",
            missing.join(", ")
        )))
    }
}
