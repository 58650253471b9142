//! Command executor for running external programs
//!
//! `npm` runs with inherited stdio so its progress reaches the user directly;
//! the Node bridge runs with captured output so its answer can be parsed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::core::error::{Error, Result};

/// A program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
    pub working_dir: PathBuf,
    /// Written to the child's stdin, which is then closed
    pub input: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, working_dir: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            working_dir: working_dir.to_path_buf(),
            input: None,
        }
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
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub(crate) fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&self.working_dir);
        command
    }

    pub(crate) fn spawn_error(&self, source: std::io::Error) -> Error {
        Error::Spawn {
            command: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            // Inline scripts are long and multi-line; keep error messages readable
            if arg.contains('\n') {
                write!(f, " <script>")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Result of command execution
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Trait for executing external programs
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run with inherited stdio; only the exit code is reported
    async fn run(&self, spec: &CommandSpec) -> Result<CommandResult>;

    /// Run with captured stdout and stderr
    async fn output(&self, spec: &CommandSpec) -> Result<CommandResult>;
}

/// Default command executor using tokio::process
#[derive(Debug, Default)]
pub struct ProcessCommandExecutor;

impl ProcessCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ProcessCommandExecutor {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        debug!(command = %spec, dir = %spec.working_dir.display(), "Running command");
        let status = spec
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| spec.spawn_error(e))?;

        Ok(CommandResult {
            exit_code: status.code().unwrap_or(-1),
            ..Default::default()
        })
    }

    async fn output(&self, spec: &CommandSpec) -> Result<CommandResult> {
        debug!(command = %spec, dir = %spec.working_dir.display(), "Running command with captured output");
        let mut child = spec
            .command()
            .stdin(if spec.input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spec.spawn_error(e))?;

        // Fed while output is collected so neither pipe fills up and blocks the child
        let writer = match (spec.input.clone(), child.stdin.take()) {
            (Some(input), Some(mut stdin)) => Some(tokio::spawn(async move {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await
            })),
            _ => None,
        };

        let output = child.wait_with_output().await?;
        if let Some(writer) = writer {
            match writer.await {
                Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => return Err(e.into()),
                Ok(_) => {}
                Err(e) => return Err(Error::bridge(format!("stdin writer failed: {e}"))),
            }
        }
        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Mock command executor for testing: replays queued results and records invocations
#[cfg(test)]
#[derive(Default)]
pub struct MockCommandExecutor {
    results: std::sync::Mutex<std::collections::VecDeque<CommandResult>>,
    pub calls: std::sync::Mutex<Vec<CommandSpec>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(self, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.results.lock().unwrap().push_back(CommandResult {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    fn next(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.calls.lock().unwrap().push(spec.clone());
        self.results.lock().unwrap().pop_front().ok_or_else(|| {
            Error::bridge(format!("Mock executor has no result for command: {spec}"))
        })
    }
}

#[cfg(test)]
#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.next(spec)
    }

    async fn output(&self, spec: &CommandSpec) -> Result<CommandResult> {
        self.next(spec)
    }
}
