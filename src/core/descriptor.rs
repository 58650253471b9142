//! Project descriptor (`package.json`) handling.
//!
//! The descriptor is seeded once by `create` and rewritten when the JDBC driver
//! needs its Maven install script. Between those two writes `npm` adds its own
//! keys (`dependencies`, ...), so unknown keys are carried through untouched.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::debug;

use crate::core::config::JAVA_MAVEN_INSTALL_SCRIPT;
use crate::core::error::Result;

/// File name of the descriptor at the project root
pub const DESCRIPTOR_FILE: &str = "package.json";

/// Version every new project starts at
pub const INITIAL_VERSION: &str = "0.0.1";

/// Script that starts the Cube.js development server
pub const DEV_SCRIPT: &str = "./node_modules/.bin/cubejs-dev-server";

const LINE_ENDING: &str = if cfg!(target_os = "windows") {
    "\r\n"
} else {
    "\n"
};

/// Java section read by `node-java-maven`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JavaConfig {
    #[serde(default)]
    pub dependencies: Vec<Value>,
}

/// The project's `package.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<JavaConfig>,
    /// Keys owned by the package manager
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectDescriptor {
    /// Seed descriptor for a freshly created project
    pub fn new(project_name: &str) -> Self {
        Self {
            name: project_name.to_string(),
            version: INITIAL_VERSION.to_string(),
            private: true,
            scripts: BTreeMap::from([("dev".to_string(), DEV_SCRIPT.to_string())]),
            java: None,
            extra: Map::new(),
        }
    }

    /// Read the descriptor from `project_dir`
    pub async fn read(project_dir: &Path) -> Result<Self> {
        let raw = fs::read_to_string(project_dir.join(DESCRIPTOR_FILE)).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the descriptor to `project_dir` with two-space indentation
    pub async fn write(&self, project_dir: &Path) -> Result<()> {
        let path = project_dir.join(DESCRIPTOR_FILE);
        debug!(path = %path.display(), "Writing project descriptor");
        fs::write(&path, self.to_json()?).await?;
        Ok(())
    }

    /// Serialized form as written to disk
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        if LINE_ENDING != "\n" {
            text = text.replace('\n', LINE_ENDING);
        }
        text.push_str(LINE_ENDING);
        Ok(text)
    }

    /// Configure the Maven install step required by the JDBC driver
    pub fn enable_java_maven(&mut self, maven_dependency: Option<Value>) {
        if let Some(dependency) = maven_dependency {
            self.java = Some(JavaConfig {
                dependencies: vec![dependency],
            });
        }
        self.scripts.insert(
            "install".to_string(),
            JAVA_MAVEN_INSTALL_SCRIPT.to_string(),
        );
    }
}
