//! Use case for creating a new Cube.js project

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::application::{EventProperties, Services};
use crate::core::config::{JAVA_MAVEN_PACKAGE, JDBC_DRIVER_PACKAGE, SERVER_PACKAGE};
use crate::core::descriptor::ProjectDescriptor;
use crate::core::error::{Error, Result};
use crate::core::templates::{Template, TemplateEnv, TemplateKind};

pub const CREATE_APP_EVENT: &str = "Create App";
pub const CREATE_APP_SUCCESS_EVENT: &str = "Create App Success";

/// Arguments of `cubejs create`
#[derive(Debug, Clone, Default)]
pub struct CreateAppRequest {
    pub project_name: Option<String>,
    pub db_type: Option<String>,
    pub template: Option<String>,
    /// Directory the project directory is created in
    pub base_dir: PathBuf,
}

impl CreateAppRequest {
    /// Properties attached to every telemetry event of this invocation
    pub fn telemetry_properties(&self) -> EventProperties {
        let mut properties = EventProperties::new();
        properties.insert("projectName".into(), optional(&self.project_name));
        properties.insert("dbType".into(), optional(&self.db_type));
        properties
    }

    /// Check the request without touching the filesystem beyond an existence check
    async fn validate(&self) -> Result<ValidatedCreateApp> {
        let db_type = non_blank(&self.db_type).ok_or(Error::MissingDbType)?;
        let project_name = non_blank(&self.project_name).ok_or(Error::MissingProjectName)?;

        let project_dir = self.base_dir.join(&project_name);
        if fs::try_exists(&project_dir).await? {
            return Err(Error::DirectoryExists(project_name));
        }

        let template = match non_blank(&self.template) {
            Some(name) => name.parse::<TemplateKind>()?,
            None => TemplateKind::default(),
        };

        Ok(ValidatedCreateApp {
            project_name,
            db_type,
            template,
            project_dir,
        })
    }
}

struct ValidatedCreateApp {
    project_name: String,
    db_type: String,
    template: TemplateKind,
    project_dir: PathBuf,
}

/// Outcome of a successful `cubejs create`
#[derive(Debug, Clone)]
pub struct CreateAppResponse {
    pub project_dir: PathBuf,
    pub template: TemplateKind,
    pub written_files: Vec<PathBuf>,
}

/// Creates a project directory, installs its dependencies and writes the template
pub struct CreateAppUseCase {
    services: Services,
}

impl CreateAppUseCase {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub async fn execute(&self, request: CreateAppRequest) -> Result<CreateAppResponse> {
        let properties = request.telemetry_properties();
        self.services
            .telemetry
            .event_in_background(CREATE_APP_EVENT, properties.clone());

        let ValidatedCreateApp {
            project_name,
            db_type,
            template,
            project_dir,
        } = request.validate().await?;

        info!(
            project = %project_name,
            db_type = %db_type,
            template = %template,
            "Creating Cube.js app"
        );

        let services = &self.services;
        services.output.ensure_directory(&project_dir).await?;

        services.console.stage("Creating project structure");
        ProjectDescriptor::new(&project_name)
            .write(&project_dir)
            .await?;

        services.console.stage("Installing server dependencies");
        services
            .installer
            .install(&project_dir, &[SERVER_PACKAGE.to_string()])
            .await?;

        services.console.stage("Installing DB driver dependencies");
        let mut driver_dependencies = services
            .server
            .driver_dependencies(&project_dir, &db_type)
            .await?;
        if driver_dependencies.is_empty() {
            return Err(Error::UnsupportedDbType(db_type));
        }
        let needs_jdbc = driver_dependencies[0] == JDBC_DRIVER_PACKAGE;
        if needs_jdbc {
            driver_dependencies.push(JAVA_MAVEN_PACKAGE.to_string());
        }
        debug!(packages = ?driver_dependencies, "Resolved driver dependencies");
        services
            .installer
            .install(&project_dir, &driver_dependencies)
            .await?;

        if needs_jdbc {
            services.console.stage("Installing JDBC dependencies");
            self.install_jdbc_dependencies(&project_dir, &db_type)
                .await?;
        }

        services.console.stage("Writing files from template");
        let template_config = Template::get(template);
        let env = TemplateEnv::new(&db_type, &project_name);
        let artifacts: Vec<_> = template_config
            .render(&env)?
            .into_iter()
            .map(|artifact| artifact.under(&project_dir))
            .collect();
        services.output.write_artifacts(&artifacts).await?;

        if !template_config.dependencies.is_empty() {
            services.console.stage("Installing template dependencies");
            let dependencies: Vec<String> = template_config
                .dependencies
                .iter()
                .map(|dependency| dependency.to_string())
                .collect();
            services
                .installer
                .install(&project_dir, &dependencies)
                .await?;
        }

        services
            .telemetry
            .event(CREATE_APP_SUCCESS_EVENT, properties)
            .await;
        services
            .console
            .stage(&format!("{project_name} app has been created 🎉"));
        self.print_next_steps(&project_name);

        Ok(CreateAppResponse {
            project_dir,
            template,
            written_files: artifacts.into_iter().map(|artifact| artifact.path).collect(),
        })
    }

    /// Configure `node-java-maven` for the database and run the install script
    async fn install_jdbc_dependencies(&self, project_dir: &Path, db_type: &str) -> Result<()> {
        let description = self
            .services
            .server
            .db_type_description(project_dir, db_type)
            .await?
            .ok_or_else(|| Error::UnsupportedDbType(db_type.to_string()))?;

        let mut descriptor = ProjectDescriptor::read(project_dir).await?;
        descriptor.enable_java_maven(description.maven_dependency);
        descriptor.write(project_dir).await?;

        self.services.installer.install_all(project_dir).await
    }

    fn print_next_steps(&self, project_name: &str) {
        let console = &self.services.console;
        for line in [
            String::new(),
            "📊 Next steps:".to_string(),
            "1. Generate schema:".to_string(),
            String::new(),
            format!("     $ cd {project_name}"),
            "     $ cubejs generate -t orders,customers".to_string(),
            String::new(),
            "2. Run dev server:".to_string(),
            String::new(),
            "     $ npm run dev".to_string(),
            String::new(),
        ] {
            console.line(&line);
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn optional(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}
