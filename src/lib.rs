//! Cube.js CLI library
//!
//! Scaffolds new Cube.js analytics API projects and generates data schema files
//! from the tables of a live database. The heavy lifting (database drivers,
//! schema scaffolding, dependency resolution) belongs to the Node.js packages the
//! CLI installs; this crate validates input, seeds the project, drives `npm` and
//! talks to those packages through a small Node bridge.
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod infrastructure;

pub use crate::core::error::{Error, ErrorKind, Result};
