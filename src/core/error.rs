//! Error handling for the Cube.js CLI.
//!
//! This module defines the main error type `Error` used throughout the crate,
//! along with a convenient `Result` type alias. Every failure of the `create`
//! and `generate` flows ends up here and is displayed by the error sink, so the
//! `Display` text of each variant is written for the person at the terminal.
//!
//! # Examples
//!
//! ```
//! use cubejs_cli::core::error::{Error, ErrorKind};
//!
//! let error = Error::UnknownTemplate("nextjs".to_string());
//! assert_eq!(error.kind(), ErrorKind::UserInput);
//! assert_eq!(error.to_string(), "Unknown template nextjs");
//! ```

use std::fmt;

use thiserror::Error;

/// Result type for Cube.js CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`], reported with the error telemetry event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid option, unknown template, existing target directory
    UserInput,
    /// Missing dependency, unsupported database type, bad configuration
    Precondition,
    /// Package installation, Node bridge, driver or I/O failures
    External,
}

impl ErrorKind {
    /// Returns the kind as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserInput => "user_input",
            Self::Precondition => "precondition",
            Self::External => "external",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for Cube.js CLI operations
#[derive(Debug, Error)]
pub enum Error {
    /// `create` invoked without `-d`
    #[error("You must pass an application name and a database type (-d).")]
    MissingDbType,

    /// `create` invoked without a project name
    #[error("You must pass an application name and a database type (-d).")]
    MissingProjectName,

    /// `generate` invoked without `-t`
    #[error("You must pass table names to generate schema from (-t).")]
    MissingTables,

    /// Target directory of `create` is already there
    #[error("We cannot create a project called {0}: directory already exist.")]
    DirectoryExists(String),

    #[error("Unknown template {0}")]
    UnknownTemplate(String),

    #[error(
        "@cubejs-backend/server dependency not found. Please run generate command from project directory."
    )]
    ServerDependencyMissing,

    #[error("Unsupported db type: {0}")]
    UnsupportedDbType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// External command exited with a non-zero status
    #[error("Command failed with exit code {exit_code}: {command}")]
    CommandFailed { command: String, exit_code: i32 },

    /// External command could not be spawned at all
    #[error("Failed to execute command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The Node bridge returned an error or no result
    #[error("Node bridge error: {0}")]
    Bridge(String),

    /// The database driver reported an error
    #[error("Driver error: {0}")]
    Driver(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Node bridge error
    pub fn bridge<S: Into<String>>(msg: S) -> Self {
        Self::Bridge(msg.into())
    }

    /// Create a new driver error
    pub fn driver<S: Into<String>>(msg: S) -> Self {
        Self::Driver(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDbType
            | Self::MissingProjectName
            | Self::MissingTables
            | Self::DirectoryExists(_)
            | Self::UnknownTemplate(_) => ErrorKind::UserInput,
            Self::ServerDependencyMissing | Self::UnsupportedDbType(_) | Self::Config(_) => {
                ErrorKind::Precondition
            }
            Self::CommandFailed { .. }
            | Self::Spawn { .. }
            | Self::Bridge(_)
            | Self::Driver(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Tera(_)
            | Self::Http(_) => ErrorKind::External,
        }
    }

    /// Lines shown in the error block.
    ///
    /// Missing-option errors carry a usage example. External errors print the
    /// raw error text followed by every underlying cause.
    pub fn lines(&self) -> Vec<String> {
        let example = match self {
            Self::MissingDbType | Self::MissingProjectName => {
                Some(" $ cubejs create hello-world -d postgres")
            }
            Self::MissingTables => Some(" $ cubejs generate -t orders,customers"),
            _ => None,
        };

        if let Some(example) = example {
            return vec![
                self.to_string(),
                String::new(),
                "Example: ".to_string(),
                example.to_string(),
            ];
        }

        let mut lines: Vec<String> = self.to_string().lines().map(str::to_string).collect();
        if self.kind() == ErrorKind::External {
            let mut source = std::error::Error::source(self);
            while let Some(cause) = source {
                let text = cause.to_string();
                if !lines.iter().any(|line| line.contains(&text)) {
                    lines.push(format!("  Caused by: {text}"));
                }
                source = cause.source();
            }
        }
        lines
    }
}
