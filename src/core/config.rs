//! Runtime configuration for the Cube.js CLI.
//!
//! Package names and the schema output directory are fixed. Everything that
//! depends on the machine the CLI runs on (program names, telemetry) can be
//! overridden through environment variables:
//!
//! - `CUBEJS_TELEMETRY`: `false`, `0`, `off` or `no` disables usage telemetry
//! - `CUBEJS_CLI_TELEMETRY_ENDPOINT`: base URL of the usage collector
//! - `CUBEJS_CLI_NPM`: package manager program (default `npm`)
//! - `CUBEJS_CLI_NODE`: Node.js program used for the bridge (default `node`)

use url::Url;

use crate::core::error::{Error, Result};

/// Server package installed into every new project
pub const SERVER_PACKAGE: &str = "@cubejs-backend/server";

/// Driver package that needs Java tooling installed next to it
pub const JDBC_DRIVER_PACKAGE: &str = "@cubejs-backend/jdbc-driver";

/// Helper package that downloads the Maven dependencies of the JDBC driver
pub const JAVA_MAVEN_PACKAGE: &str = "node-java-maven";

/// Install script that triggers [`JAVA_MAVEN_PACKAGE`]
pub const JAVA_MAVEN_INSTALL_SCRIPT: &str = "./node_modules/.bin/node-java-maven";

/// Directory, relative to the project root, that receives generated schema files
pub const SCHEMA_DIR: &str = "schema";

/// Write key of the anonymous usage collector
pub const TELEMETRY_WRITE_KEY: &str = "dSR8JiNYIGKyQHKid9OaLYugXLao18hA";

pub const DEFAULT_TELEMETRY_ENDPOINT: &str = "https://api.segment.io";

pub const ENV_TELEMETRY: &str = "CUBEJS_TELEMETRY";
pub const ENV_TELEMETRY_ENDPOINT: &str = "CUBEJS_CLI_TELEMETRY_ENDPOINT";
pub const ENV_NPM: &str = "CUBEJS_CLI_NPM";
pub const ENV_NODE: &str = "CUBEJS_CLI_NODE";

/// Default package manager program; `npm` is a batch script on Windows
pub fn default_npm_program() -> &'static str {
    if cfg!(target_os = "windows") {
        "npm.cmd"
    } else {
        "npm"
    }
}

/// CLI configuration resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub telemetry_enabled: bool,
    pub telemetry_endpoint: Url,
    pub telemetry_write_key: String,
    pub npm_program: String,
    pub node_program: String,
}

impl CliConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let telemetry_enabled = non_empty(ENV_TELEMETRY)
            .map(|value| {
                !matches!(
                    value.trim().to_lowercase().as_str(),
                    "false" | "0" | "off" | "no"
                )
            })
            .unwrap_or(true);

        let endpoint =
            non_empty(ENV_TELEMETRY_ENDPOINT).unwrap_or_else(|| DEFAULT_TELEMETRY_ENDPOINT.into());
        let telemetry_endpoint = Url::parse(endpoint.trim()).map_err(|e| {
            Error::config(format!(
                "{ENV_TELEMETRY_ENDPOINT} is not a valid URL ({endpoint}): {e}"
            ))
        })?;

        Ok(Self {
            telemetry_enabled,
            telemetry_endpoint,
            telemetry_write_key: TELEMETRY_WRITE_KEY.to_string(),
            npm_program: non_empty(ENV_NPM).unwrap_or_else(|| default_npm_program().to_string()),
            node_program: non_empty(ENV_NODE).unwrap_or_else(|| "node".to_string()),
        })
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            telemetry_enabled: true,
            telemetry_endpoint: Url::parse(DEFAULT_TELEMETRY_ENDPOINT)
                .expect("default telemetry endpoint is a valid URL"),
            telemetry_write_key: TELEMETRY_WRITE_KEY.to_string(),
            npm_program: default_npm_program().to_string(),
            node_program: "node".to_string(),
        }
    }
}
