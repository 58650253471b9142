//! npm-backed package installer

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::application::PackageInstaller;
use crate::core::error::{Error, Result};
use crate::infrastructure::shell::{CommandExecutor, CommandSpec};

/// Installs packages with `npm install`, streaming npm's output to the terminal
pub struct NpmInstaller {
    executor: Arc<dyn CommandExecutor>,
    program: String,
}

impl NpmInstaller {
    pub fn new(executor: Arc<dyn CommandExecutor>, program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }

    async fn run(&self, spec: CommandSpec) -> Result<()> {
        info!(command = %spec, "Installing packages");
        let result = self.executor.run(&spec).await?;
        if !result.is_success() {
            error!(command = %spec, exit_code = result.exit_code, "Package installation failed");
            return Err(Error::CommandFailed {
                command: spec.to_string(),
                exit_code: result.exit_code,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PackageInstaller for NpmInstaller {
    async fn install(&self, project_dir: &Path, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        let spec = CommandSpec::new(&self.program, project_dir)
            .args(["install", "--save"])
            .args(packages.iter().cloned());
        self.run(spec).await
    }

    async fn install_all(&self, project_dir: &Path) -> Result<()> {
        self.run(CommandSpec::new(&self.program, project_dir).arg("install"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::shell::MockCommandExecutor;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_install_saves_packages() {
        let executor = Arc::new(MockCommandExecutor::new().with_result(0, "", ""));
        let installer = NpmInstaller::new(executor.clone(), "npm");
        let project = PathBuf::from("/tmp/hello-world");

        installer
            .install(
                &project,
                &[
                    "@cubejs-backend/jdbc-driver".to_string(),
                    "node-java-maven".to_string(),
                ],
            )
            .await
            .unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "npm");
        assert_eq!(
            calls[0].args,
            vec![
                "install",
                "--save",
                "@cubejs-backend/jdbc-driver",
                "node-java-maven"
            ]
        );
        assert_eq!(calls[0].working_dir, project);
    }

    #[tokio::test]
    async fn test_install_nothing_is_a_no_op() {
        let executor = Arc::new(MockCommandExecutor::new());
        let installer = NpmInstaller::new(executor.clone(), "npm");

        installer.install(Path::new("."), &[]).await.unwrap();

        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_install_all_runs_plain_install() {
        let executor = Arc::new(MockCommandExecutor::new().with_result(0, "", ""));
        let installer = NpmInstaller::new(executor.clone(), "npm.cmd");

        installer.install_all(Path::new("app")).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls[0].to_string(), "npm.cmd install");
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails_with_command() {
        let executor = Arc::new(MockCommandExecutor::new().with_result(254, "", ""));
        let installer = NpmInstaller::new(executor, "npm");

        let err = installer
            .install(Path::new("."), &["@cubejs-backend/server".to_string()])
            .await
            .unwrap_err();

        match err {
            Error::CommandFailed { command, exit_code } => {
                assert_eq!(command, "npm install --save @cubejs-backend/server");
                assert_eq!(exit_code, 254);
            }
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
    }
}
