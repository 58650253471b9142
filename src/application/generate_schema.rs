//! Use case for generating Cube.js schema files from database tables

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::application::{EventProperties, Services};
use crate::core::config::{SCHEMA_DIR, SERVER_PACKAGE};
use crate::core::error::{Error, Result};
use crate::core::templates::Artifact;

pub const GENERATE_SCHEMA_EVENT: &str = "Generate Schema";
pub const GENERATE_SCHEMA_SUCCESS_EVENT: &str = "Generate Schema Success";

/// Arguments of `cubejs generate`
#[derive(Debug, Clone, Default)]
pub struct GenerateSchemaRequest {
    pub tables: Vec<String>,
    /// Project root, normally the current directory
    pub project_dir: PathBuf,
}

impl GenerateSchemaRequest {
    /// Build a request from the raw `-t` values, dropping blank and repeated entries
    pub fn new(tables: Option<Vec<String>>, project_dir: PathBuf) -> Self {
        let mut seen = HashSet::new();
        let tables = tables
            .unwrap_or_default()
            .into_iter()
            .map(|table| table.trim().to_string())
            .filter(|table| !table.is_empty() && seen.insert(table.clone()))
            .collect();
        Self {
            tables,
            project_dir,
        }
    }

    pub fn telemetry_properties(&self) -> EventProperties {
        let mut properties = EventProperties::new();
        let tables = if self.tables.is_empty() {
            Value::Null
        } else {
            Value::from(self.tables.clone())
        };
        properties.insert("tables".into(), tables);
        properties
    }
}

/// Outcome of a successful `cubejs generate`
#[derive(Debug, Clone)]
pub struct GenerateSchemaResponse {
    pub written_files: Vec<PathBuf>,
}

/// Fetches the table schema through the project's driver and writes schema files
pub struct GenerateSchemaUseCase {
    services: Services,
}

impl GenerateSchemaUseCase {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub async fn execute(&self, request: GenerateSchemaRequest) -> Result<GenerateSchemaResponse> {
        let properties = request.telemetry_properties();
        let services = &self.services;
        services
            .telemetry
            .event_in_background(GENERATE_SCHEMA_EVENT, properties.clone());

        if request.tables.is_empty() {
            return Err(Error::MissingTables);
        }
        let project_dir = &request.project_dir;
        if !server_package_installed(project_dir).await? {
            return Err(Error::ServerDependencyMissing);
        }

        info!(tables = ?request.tables, "Generating schema");

        services.console.stage("Fetching DB schema");
        let mut driver = services.server.create_driver(project_dir).await?;
        driver.test_connection().await?;
        let schema = driver.tables_schema().await?;
        driver.release().await?;

        services.console.stage("Generating schema files");
        let files = services
            .scaffolder
            .generate_files_by_table_names(project_dir, &schema, &request.tables)
            .await?;

        let schema_dir = project_dir.join(SCHEMA_DIR);
        let mut file_names = HashSet::new();
        let artifacts = files
            .into_iter()
            .map(|file| {
                check_file_name(&file.file_name)?;
                if !file_names.insert(file.file_name.clone()) {
                    return Err(Error::bridge(format!(
                        "schema generator returned {:?} more than once",
                        file.file_name
                    )));
                }
                Ok(Artifact::new(file.file_name, file.content).under(&schema_dir))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(count = artifacts.len(), dir = %schema_dir.display(), "Writing schema files");
        services.output.ensure_directory(&schema_dir).await?;
        services.output.write_artifacts(&artifacts).await?;

        services
            .telemetry
            .event(GENERATE_SCHEMA_SUCCESS_EVENT, properties)
            .await;
        services.console.stage(&format!(
            "Schema for {} was successfully generated 🎉",
            request.tables.join(", ")
        ));

        Ok(GenerateSchemaResponse {
            written_files: artifacts.into_iter().map(|artifact| artifact.path).collect(),
        })
    }
}

/// Whether `node_modules/@cubejs-backend/server` exists under `project_dir`
pub async fn server_package_installed(project_dir: &Path) -> Result<bool> {
    let path = SERVER_PACKAGE
        .split('/')
        .fold(project_dir.join("node_modules"), |path, part| path.join(part));
    Ok(fs::try_exists(path).await?)
}

/// Generated names must stay inside the schema directory
fn check_file_name(file_name: &str) -> Result<()> {
    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::bridge(format!(
            "schema generator returned an invalid file name: {file_name:?}"
        ))),
    }
}
