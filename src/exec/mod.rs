// file: src/exec/mod.rs
// version: 1.0.0
// guid: f5481d98-10bc-4497-a35b-0f75fd709494

//! Host command execution
//!
//! Every external tool (qm, pvesh, virt-customize, unpack commands) is
//! invoked through [`CommandRunner`] so the import pipeline can be driven
//! by a recording fake in tests.

pub mod local;

pub use local::LocalRunner;

use crate::error::ImportError;
use crate::Result;
use std::fmt;

/// A single external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment variables for this invocation only
    pub env: Vec<(String, String)>,
}

impl HostCommand {
    /// Create a command for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Run a command line through `sh -c`
    pub fn shell(line: impl Into<String>) -> Self {
        Self::new("sh").arg("-c").arg(line)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// True for commands built with [`HostCommand::shell`]
    pub fn is_shell(&self) -> bool {
        self.program == "sh" && self.args.len() == 2 && self.args[0] == "-c"
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_shell() {
            return write!(f, "{}", self.args[1]);
        }

        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output carrying `stdout`
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given code and stderr
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into a `ProcessError` for `command`
    pub fn check(self, command: &HostCommand) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        Err(ImportError::ProcessError {
            command: command.to_string(),
            exit_code: self.exit_code,
            stderr: if self.stderr.trim().is_empty() {
                self.stdout.trim().to_string()
            } else {
                self.stderr.trim().to_string()
            },
        })
    }
}

/// Trait for executing host commands
///
/// Implementations return `Err` only when the command could not be run at
/// all; a non-zero exit is reported through [`CommandOutput::exit_code`].
#[async_trait::async_trait]
pub trait CommandRunner: Send {
    /// Run with output streamed to the terminal
    async fn run(&mut self, command: &HostCommand) -> Result<CommandOutput>;

    /// Run with stdout and stderr captured
    async fn capture(&mut self, command: &HostCommand) -> Result<CommandOutput>;

    /// Run and fail on a non-zero exit
    async fn run_checked(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        self.run(command).await?.check(command)
    }

    /// Capture and fail on a non-zero exit
    async fn capture_checked(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        self.capture(command).await?.check(command)
    }
}

#[async_trait::async_trait]
impl<'a, R: CommandRunner + ?Sized> CommandRunner for &'a mut R {
    async fn run(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        (**self).run(command).await
    }

    async fn capture(&mut self, command: &HostCommand) -> Result<CommandOutput> {
        (**self).capture(command).await
    }
}
