//! Infrastructure layer - concrete implementations of the application ports

pub mod console;
pub mod node;
pub mod npm;
pub mod output;
pub mod shell;
pub mod telemetry;

use std::sync::Arc;

use crate::application::Services;
use crate::core::config::CliConfig;

pub use console::StdConsole;
pub use node::{NodeBridge, NodeScaffolder, NodeServerPackage};
pub use npm::NpmInstaller;
pub use output::FileSystemOutputService;
pub use shell::*;

/// Wire the real collaborators for a CLI run
pub fn build_services(config: &CliConfig) -> Services {
    let executor: Arc<dyn CommandExecutor> = Arc::new(ProcessCommandExecutor::new());
    let bridge = NodeBridge::new(executor.clone(), config.node_program.clone());

    Services {
        installer: Arc::new(NpmInstaller::new(executor, config.npm_program.clone())),
        server: Arc::new(NodeServerPackage::new(bridge.clone())),
        scaffolder: Arc::new(NodeScaffolder::new(bridge)),
        output: Arc::new(FileSystemOutputService::new()),
        telemetry: telemetry::from_config(config),
        console: Arc::new(StdConsole),
    }
}
