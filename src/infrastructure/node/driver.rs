//! Database driver living in a Node child process

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout};
use tracing::debug;

use crate::application::{Driver, TablesSchema};
use crate::core::error::{Error, Result};
use crate::infrastructure::node::protocol::{self, Request};
use crate::infrastructure::node::{MODE_DRIVER, NodeBridge};

/// A driver created by the project's `@cubejs-backend/server`.
///
/// The child stays alive between calls so the connection opened by
/// `testConnection` is reused by `tablesSchema`. It is killed if dropped
/// without [`Driver::release`].
pub struct NodeDriver {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    next_id: u64,
}

impl NodeDriver {
    /// Start the bridge in driver mode and wait until the driver is created
    pub async fn spawn(bridge: &NodeBridge, project_dir: &Path) -> Result<Self> {
        let spec = bridge.command(project_dir, MODE_DRIVER, "");
        debug!(dir = %project_dir.display(), "Starting Node driver");
        let mut child = spec
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spec.spawn_error(e))?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::bridge("driver process has no stdout"))?;

        let mut driver = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            next_id: 1,
        };
        driver.read_answer(0).await?;
        Ok(driver)
    }

    async fn request(&mut self, method: &str) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;
        let line = Request { id, method }.to_line()?;

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| Error::driver("driver was already released"))?;
        debug!(id, method, "Driver request");
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await?;

        self.read_answer(id).await
    }

    async fn read_answer(&mut self, id: u64) -> Result<Value> {
        while let Some(line) = self.stdout.next_line().await? {
            let Some(envelope) = protocol::parse_line(&line) else {
                debug!(output = %line, "Driver output");
                continue;
            };
            let envelope = envelope?;
            let answered = envelope.id;
            match envelope.into_result() {
                Err(error) => return Err(Error::driver(error)),
                Ok(value) if answered == Some(id) => return Ok(value),
                Ok(_) => debug!(?answered, expected = id, "Ignoring stale driver answer"),
            }
        }
        let status = self.child.wait().await?;
        Err(Error::driver(format!(
            "driver process exited before answering ({status})"
        )))
    }
}

#[async_trait]
impl Driver for NodeDriver {
    async fn test_connection(&mut self) -> Result<()> {
        self.request("testConnection").await?;
        Ok(())
    }

    async fn tables_schema(&mut self) -> Result<TablesSchema> {
        Ok(TablesSchema(self.request("tablesSchema").await?))
    }

    async fn release(&mut self) -> Result<()> {
        if self.stdin.is_none() {
            return Ok(());
        }
        self.request("release").await?;
        self.stdin = None;
        let status = self.child.wait().await?;
        debug!(%status, "Node driver released");
        Ok(())
    }
}
