//! Application layer - the `create` and `generate` use cases and the error sink

pub mod create_app;
pub mod error_sink;
pub mod generate_schema;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use create_app::*;
pub use error_sink::*;
pub use generate_schema::*;
pub use traits::*;

/// Collaborators shared by both use cases
#[derive(Clone)]
pub struct Services {
    pub installer: Arc<dyn PackageInstaller>,
    pub server: Arc<dyn ServerPackage>,
    pub scaffolder: Arc<dyn SchemaScaffolder>,
    pub output: Arc<dyn OutputService>,
    pub telemetry: Arc<dyn Telemetry>,
    pub console: Arc<dyn Console>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
