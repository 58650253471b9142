//! In-memory ports for exercising the use cases

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::application::{
    Console, DbTypeDescription, Driver, EventProperties, PackageInstaller, SchemaFile,
    SchemaScaffolder, ServerPackage, Services, TablesSchema, Telemetry,
};
use crate::core::error::{Error, Result};
use crate::infrastructure::output::FileSystemOutputService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallCall {
    Packages(Vec<String>),
    All,
}

#[derive(Default)]
pub struct MockInstaller {
    calls: Mutex<Vec<InstallCall>>,
    fail: bool,
}

impl MockInstaller {
    pub fn calls(&self) -> Vec<InstallCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: InstallCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(Error::CommandFailed {
                command: "npm install".to_string(),
                exit_code: 1,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PackageInstaller for MockInstaller {
    async fn install(&self, _project_dir: &Path, packages: &[String]) -> Result<()> {
        self.record(InstallCall::Packages(packages.to_vec()))
    }

    async fn install_all(&self, _project_dir: &Path) -> Result<()> {
        self.record(InstallCall::All)
    }
}

pub struct MockServerPackage {
    driver_dependencies: Vec<String>,
    db_type_description: Option<Value>,
    schema: Value,
    fail_connection: bool,
    pub driver_log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ServerPackage for MockServerPackage {
    async fn driver_dependencies(&self, _project_dir: &Path, _db_type: &str) -> Result<Vec<String>> {
        Ok(self.driver_dependencies.clone())
    }

    async fn db_type_description(
        &self,
        _project_dir: &Path,
        _db_type: &str,
    ) -> Result<Option<DbTypeDescription>> {
        match &self.db_type_description {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    async fn create_driver(&self, _project_dir: &Path) -> Result<Box<dyn Driver>> {
        self.driver_log.lock().unwrap().push("createDriver".to_string());
        Ok(Box::new(MockDriver {
            schema: self.schema.clone(),
            fail_connection: self.fail_connection,
            log: self.driver_log.clone(),
        }))
    }
}

struct MockDriver {
    schema: Value,
    fail_connection: bool,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Driver for MockDriver {
    async fn test_connection(&mut self) -> Result<()> {
        self.log.lock().unwrap().push("testConnection".to_string());
        if self.fail_connection {
            return Err(Error::driver("connect ECONNREFUSED 127.0.0.1:5432"));
        }
        Ok(())
    }

    async fn tables_schema(&mut self) -> Result<TablesSchema> {
        self.log.lock().unwrap().push("tablesSchema".to_string());
        Ok(TablesSchema(self.schema.clone()))
    }

    async fn release(&mut self) -> Result<()> {
        self.log.lock().unwrap().push("release".to_string());
        Ok(())
    }
}

/// Produces `<Table>.js` per requested table unless `files` is set
#[derive(Default)]
pub struct MockScaffolder {
    calls: Mutex<Vec<(TablesSchema, Vec<String>)>>,
    files: Option<Vec<SchemaFile>>,
}

impl MockScaffolder {
    pub fn calls(&self) -> Vec<(TablesSchema, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SchemaScaffolder for MockScaffolder {
    async fn generate_files_by_table_names(
        &self,
        _project_dir: &Path,
        schema: &TablesSchema,
        table_names: &[String],
    ) -> Result<Vec<SchemaFile>> {
        self.calls
            .lock()
            .unwrap()
            .push((schema.clone(), table_names.to_vec()));
        if let Some(files) = &self.files {
            return Ok(files.clone());
        }
        Ok(table_names
            .iter()
            .map(|table| {
                let mut chars = table.chars();
                let cube: String = match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                };
                SchemaFile {
                    file_name: format!("{cube}.js"),
                    content: format!("cube(`{cube}`, {{\n  sql: `SELECT * FROM public.{table}`\n}});\n"),
                }
            })
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, EventProperties)>>,
    background: Mutex<Vec<String>>,
}

impl RecordingTelemetry {
    /// Names of events sent with `event_in_background`
    pub fn background_event_names(&self) -> Vec<String> {
        self.background.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<(String, EventProperties)> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|(name, _)| name).collect()
    }
}

#[async_trait]
impl Telemetry for RecordingTelemetry {
    async fn event(&self, name: &str, properties: EventProperties) {
        self.events
            .lock()
            .unwrap()
            .push((name.to_string(), properties));
    }

    fn event_in_background(&self, name: &str, properties: EventProperties) {
        self.background.lock().unwrap().push(name.to_string());
        self.events
            .lock()
            .unwrap()
            .push((name.to_string(), properties));
    }
}

#[derive(Default)]
pub struct RecordingConsole {
    stages: Mutex<Vec<String>>,
    lines: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
    help_shown: Mutex<bool>,
}

impl RecordingConsole {
    pub fn stages(&self) -> Vec<String> {
        self.stages.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn help_shown(&self) -> bool {
        *self.help_shown.lock().unwrap()
    }
}

impl Console for RecordingConsole {
    fn stage(&self, text: &str) {
        self.stages.lock().unwrap().push(text.to_string());
    }

    fn line(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }

    fn error_block(&self, lines: &[String]) {
        self.errors.lock().unwrap().extend(lines.iter().cloned());
    }

    fn help_pointers(&self) {
        *self.help_shown.lock().unwrap() = true;
    }
}

/// Mock collaborators plus the real filesystem output
pub struct Fixture {
    pub installer: Arc<MockInstaller>,
    pub server: Arc<MockServerPackage>,
    pub scaffolder: Arc<MockScaffolder>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub console: Arc<RecordingConsole>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            installer: Arc::new(MockInstaller::default()),
            server: Arc::new(MockServerPackage {
                driver_dependencies: vec!["@cubejs-backend/postgres-driver".to_string()],
                db_type_description: None,
                schema: serde_json::json!({ "public": { "orders": [], "customers": [] } }),
                fail_connection: false,
                driver_log: Arc::new(Mutex::new(Vec::new())),
            }),
            scaffolder: Arc::new(MockScaffolder::default()),
            telemetry: Arc::new(RecordingTelemetry::default()),
            console: Arc::new(RecordingConsole::default()),
        }
    }

    pub fn with_driver_dependencies(mut self, packages: &[&str]) -> Self {
        self.server_mut().driver_dependencies = packages.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_db_type_description(mut self, description: Option<Value>) -> Self {
        self.server_mut().db_type_description = description;
        self
    }

    pub fn with_failing_connection(mut self) -> Self {
        self.server_mut().fail_connection = true;
        self
    }

    pub fn with_failing_install(mut self) -> Self {
        self.installer = Arc::new(MockInstaller {
            calls: Mutex::new(Vec::new()),
            fail: true,
        });
        self
    }

    pub fn with_scaffolded_files(mut self, files: Vec<SchemaFile>) -> Self {
        self.scaffolder = Arc::new(MockScaffolder {
            calls: Mutex::new(Vec::new()),
            files: Some(files),
        });
        self
    }

    pub fn driver_log(&self) -> Vec<String> {
        self.server.driver_log.lock().unwrap().clone()
    }

    fn server_mut(&mut self) -> &mut MockServerPackage {
        Arc::get_mut(&mut self.server).expect("fixture server is configured before use")
    }

    pub fn services(&self) -> Services {
        Services {
            installer: self.installer.clone(),
            server: self.server.clone(),
            scaffolder: self.scaffolder.clone(),
            output: Arc::new(FileSystemOutputService::new()),
            telemetry: self.telemetry.clone(),
            console: self.console.clone(),
        }
    }
}
