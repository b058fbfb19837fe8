// file: src/exec/local.rs
// version: 1.0.0
// guid: 822b2bad-ea38-4218-aed9-723bf2f5d7e9

//! Local command execution on the virtualization host

use super::{CommandOutput, CommandRunner, HostCommand};
use crate::error::ImportError;
use crate::Result;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs host commands with `tokio::process`, echoing each one first
#[derive(Debug, Default)]
pub struct LocalRunner;

impl LocalRunner {
    /// Create a new local runner
    pub fn new() -> Self {
        Self
    }

    fn build(command: &HostCommand) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        for (key, value) in &command.env {
            cmd.env(key, value);
        }
        cmd
    }

    fn spawn_error(command: &HostCommand, e: std::io::Error) -> ImportError {
        ImportError::ProcessError {
            command: command.to_string(),
            exit_code: None,
            stderr: format!("Failed to execute command: {}", e),
        }
    }
}

#[async_trait::async_trait]
impl CommandRunner for LocalRunner {
    async fn run(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        info!("# {}", command);

        let status = Self::build(command)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Self::spawn_error(command, e))?;

        debug!("Command exited with {:?}", status.code());
        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    async fn capture(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        info!("# {}", command);

        let output = Self::build(command)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Self::spawn_error(command, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!(
            "Command exited with {:?} ({} bytes of output)",
            output.status.code(),
            stdout.len()
        );

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout,
            stderr,
        })
    }
}
