//! Values flowing into and out of template rendering

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::core::secret::generate_api_secret;

/// Environment every template file is rendered against
#[derive(Debug, Clone)]
pub struct TemplateEnv {
    pub db_type: String,
    pub api_secret: Zeroizing<String>,
    pub project_name: String,
}

impl TemplateEnv {
    /// Environment for a new project with a freshly generated API secret
    pub fn new(db_type: &str, project_name: &str) -> Self {
        Self {
            db_type: db_type.to_string(),
            api_secret: generate_api_secret(),
            project_name: project_name.to_string(),
        }
    }

    pub(crate) fn to_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        context.insert("db_type", &self.db_type);
        context.insert("api_secret", self.api_secret.as_str());
        context.insert("project_name", &self.project_name);
        context
    }
}

/// A file ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Re-root a relative artifact path under `base`
    pub fn under(mut self, base: &Path) -> Self {
        self.path = base.join(&self.path);
        self
    }
}
