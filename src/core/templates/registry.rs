//! Static registry of the built-in project templates.
//!
//! Each template is a list of `{file path -> Tera source}` pairs compiled into
//! the binary, plus the npm packages the template needs on top of the server
//! and driver packages.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tera::Tera;
use tracing::debug;

use crate::core::error::Result;
use crate::core::templates::{Artifact, TemplateEnv, TemplateKind};

const EXPRESS_INDEX_JS: &str = include_str!("../../../templates/express/index.js.tera");
const SERVERLESS_CUBE_JS: &str = include_str!("../../../templates/serverless/cube.js.tera");
const SERVERLESS_YML: &str = include_str!("../../../templates/serverless/serverless.yml.tera");
const DOT_ENV: &str = include_str!("../../../templates/common/env.tera");
const GITIGNORE: &str = include_str!("../../../templates/common/gitignore.tera");
const ORDERS_SCHEMA: &str = include_str!("../../../templates/common/schema/Orders.js.tera");

static TEMPLATES: Lazy<HashMap<TemplateKind, Template>> = Lazy::new(|| {
    TemplateKind::all()
        .map(|kind| (kind, Template::build(kind)))
        .collect()
});

/// One file of a template: destination path relative to the project root and its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: &'static str,
    pub source: &'static str,
}

impl TemplateFile {
    const fn new(path: &'static str, source: &'static str) -> Self {
        Self { path, source }
    }
}

/// A named project skeleton
#[derive(Debug, Clone)]
pub struct Template {
    pub kind: TemplateKind,
    pub files: Vec<TemplateFile>,
    pub dependencies: Vec<&'static str>,
}

impl Template {
    /// Look up a built-in template
    pub fn get(kind: TemplateKind) -> &'static Template {
        &TEMPLATES[&kind]
    }

    fn build(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Express => Self {
                kind,
                files: vec![
                    TemplateFile::new("index.js", EXPRESS_INDEX_JS),
                    TemplateFile::new(".env", DOT_ENV),
                    TemplateFile::new(".gitignore", GITIGNORE),
                    TemplateFile::new("schema/Orders.js", ORDERS_SCHEMA),
                ],
                dependencies: Vec::new(),
            },
            TemplateKind::Serverless => Self {
                kind,
                files: vec![
                    TemplateFile::new("cube.js", SERVERLESS_CUBE_JS),
                    TemplateFile::new("serverless.yml", SERVERLESS_YML),
                    TemplateFile::new(".env", DOT_ENV),
                    TemplateFile::new(".gitignore", GITIGNORE),
                    TemplateFile::new("schema/Orders.js", ORDERS_SCHEMA),
                ],
                dependencies: vec!["@cubejs-backend/serverless"],
            },
        }
    }

    /// Destination paths of every file in this template
    pub fn file_paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.files.iter().map(|file| file.path)
    }

    /// Render every file against `env`; paths stay relative to the project root
    pub fn render(&self, env: &TemplateEnv) -> Result<Vec<Artifact>> {
        let mut tera = Tera::default();
        tera.add_raw_templates(self.files.iter().map(|file| (file.path, file.source)))?;

        let context = env.to_context();
        self.files
            .iter()
            .map(|file| {
                debug!(template = %self.kind, file = file.path, "Rendering template file");
                Ok(Artifact::new(file.path, tera.render(file.path, &context)?))
            })
            .collect()
    }
}
