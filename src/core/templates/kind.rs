//! Built-in project template kinds.
//!
//! # Examples
//!
//! ```
//! use cubejs_cli::core::templates::TemplateKind;
//! use std::str::FromStr;
//!
//! let template = TemplateKind::from_str("serverless").unwrap();
//! assert_eq!(template, TemplateKind::Serverless);
//! assert_eq!(template.as_str(), "serverless");
//!
//! // The default template is Express
//! assert_eq!(TemplateKind::default(), TemplateKind::Express);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::core::error::Error;

/// Project templates selectable with `cubejs create -t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum TemplateKind {
    /// Standalone Express server
    #[default]
    Express,
    /// AWS Lambda deployment through the Serverless framework
    Serverless,
}

impl TemplateKind {
    /// Returns the template identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Express => "express",
            Self::Serverless => "serverless",
        }
    }

    /// Returns an iterator over all built-in template kinds
    pub fn all() -> impl Iterator<Item = Self> {
        use TemplateKind::*;
        [Express, Serverless].iter().copied()
    }
}

impl FromStr for TemplateKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownTemplate(s.to_string()))
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
