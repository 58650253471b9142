//! Project templates used by `cubejs create`.
//!
//! A template is a named bundle of files rendered against a [`TemplateEnv`]
//! (database type, API secret, project name) plus an optional list of extra npm
//! dependencies. Templates are compiled into the binary and looked up by
//! [`TemplateKind`].

pub mod kind;
pub mod registry;
pub mod types;

pub use kind::*;
pub use registry::*;
pub use types::*;
