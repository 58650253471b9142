//! Port interfaces for the application layer
//!
//! Everything the two flows touch outside their own process goes through one
//! of these traits, which keeps the use cases testable without `npm`, `node` or
//! a database.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::error::Result;
use crate::core::templates::Artifact;

/// Properties attached to a telemetry event
pub type EventProperties = Map<String, Value>;

/// Installs npm packages into a project
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    /// Install and save the given packages
    async fn install(&self, project_dir: &Path, packages: &[String]) -> Result<()>;

    /// Install everything the descriptor declares, running its install script
    async fn install_all(&self, project_dir: &Path) -> Result<()>;
}

/// JDBC description of a database type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbTypeDescription {
    #[serde(default)]
    pub maven_dependency: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw table schema returned by a driver; opaque to the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TablesSchema(pub Value);

/// A generated schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFile {
    pub file_name: String,
    pub content: String,
}

/// The `@cubejs-backend/server` package installed in a project
#[async_trait]
pub trait ServerPackage: Send + Sync {
    /// Driver packages required for `db_type`
    async fn driver_dependencies(&self, project_dir: &Path, db_type: &str) -> Result<Vec<String>>;

    /// JDBC description of `db_type`, `None` when the JDBC driver does not know it
    async fn db_type_description(
        &self,
        project_dir: &Path,
        db_type: &str,
    ) -> Result<Option<DbTypeDescription>>;

    /// Create a driver configured from the project's environment
    async fn create_driver(&self, project_dir: &Path) -> Result<Box<dyn Driver>>;
}

/// A live database driver
#[async_trait]
pub trait Driver: Send {
    async fn test_connection(&mut self) -> Result<()>;

    async fn tables_schema(&mut self) -> Result<TablesSchema>;

    /// Release connections; a no-op for drivers without a release operation
    async fn release(&mut self) -> Result<()>;
}

/// Turns a table schema into Cube.js schema files
#[async_trait]
pub trait SchemaScaffolder: Send + Sync {
    async fn generate_files_by_table_names(
        &self,
        project_dir: &Path,
        schema: &TablesSchema,
        table_names: &[String],
    ) -> Result<Vec<SchemaFile>>;
}

/// Service for writing generated artifacts to the output destination
#[async_trait]
pub trait OutputService: Send + Sync {
    /// Write all artifacts, creating parent directories and overwriting existing files
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<()>;

    /// Ensure a directory exists
    async fn ensure_directory(&self, path: &Path) -> Result<()>;
}

/// Anonymous usage telemetry; implementations swallow their own failures
#[async_trait]
pub trait Telemetry: Send + Sync {
    /// Send and wait for delivery, bounded by the client timeout
    async fn event(&self, name: &str, properties: EventProperties);

    /// Send without holding up the caller; may be lost if the process exits first
    fn event_in_background(&self, name: &str, properties: EventProperties);
}

/// User-facing console output
pub trait Console: Send + Sync {
    /// Progress stage, printed as `- <stage>`
    fn stage(&self, text: &str);

    /// Plain line on stdout
    fn line(&self, text: &str);

    /// Framed error block on stderr, closed by the "need some help" rule
    fn error_block(&self, lines: &[String]);

    /// Where to ask for help, on stderr
    fn help_pointers(&self);
}
