//! Access to the Node.js packages installed in a project
//!
//! The server package, the JDBC driver and the schema scaffolder only exist as
//! JavaScript. They are reached through an embedded bridge script run with the
//! local `node` binary inside the project directory.

pub mod driver;
pub mod protocol;
pub mod server_package;
#[cfg(test)]
pub mod test_support;

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::{Error, Result};
use crate::infrastructure::shell::{CommandExecutor, CommandSpec};

pub use driver::NodeDriver;
pub use server_package::{NodeScaffolder, NodeServerPackage};

pub const BRIDGE_SCRIPT: &str = include_str!("bridge.js");
pub const ENV_BRIDGE_MODE: &str = "CUBEJS_CLI_BRIDGE_MODE";
pub const ENV_BRIDGE_ARG: &str = "CUBEJS_CLI_BRIDGE_ARG";

pub const MODE_DRIVER_DEPENDENCIES: &str = "driver-dependencies";
pub const MODE_DB_TYPE_DESCRIPTION: &str = "db-type-description";
pub const MODE_SCAFFOLD: &str = "scaffold";
pub const MODE_DRIVER: &str = "driver";

/// Runs one-shot bridge calls through a [`CommandExecutor`]
#[derive(Clone)]
pub struct NodeBridge {
    executor: Arc<dyn CommandExecutor>,
    node_program: String,
}

impl NodeBridge {
    pub fn new(executor: Arc<dyn CommandExecutor>, node_program: impl Into<String>) -> Self {
        Self {
            executor,
            node_program: node_program.into(),
        }
    }

    pub fn node_program(&self) -> &str {
        &self.node_program
    }

    /// `node -e <bridge>` in `project_dir` with the mode and argument in the environment
    pub fn command(&self, project_dir: &Path, mode: &str, arg: &str) -> CommandSpec {
        CommandSpec::new(&self.node_program, project_dir)
            .arg("-e")
            .arg(BRIDGE_SCRIPT)
            .env(ENV_BRIDGE_MODE, mode)
            .env(ENV_BRIDGE_ARG, arg)
    }

    /// Run a one-shot mode and decode its result
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        project_dir: &Path,
        mode: &str,
        arg: &str,
        input: Option<String>,
    ) -> Result<T> {
        let mut spec = self.command(project_dir, mode, arg);
        if let Some(input) = input {
            spec = spec.input(input);
        }
        debug!(mode, arg, "Invoking Node bridge");
        let output = self.executor.output(&spec).await?;

        let envelope = match protocol::find_envelope(&output.stdout) {
            Some(envelope) => envelope?,
            None => {
                return Err(Error::bridge(format!(
                    "{mode} exited with code {} without an answer{}",
                    output.exit_code,
                    stderr_suffix(&output.stderr)
                )));
            }
        };
        let value = envelope.into_result().map_err(Error::bridge)?;
        serde_json::from_value(value)
            .map_err(|e| Error::bridge(format!("unexpected {mode} answer: {e}")))
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
