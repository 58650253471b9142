//! Cube.js CLI core
//!
//! Domain types shared by both flows: errors, configuration, the project
//! descriptor, secret generation and the built-in project templates.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod secret;
pub mod templates;

pub use error::Error;
