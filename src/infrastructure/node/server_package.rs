//! Server package and scaffolder backed by the project's `node_modules`

use std::path::Path;

use async_trait::async_trait;

use crate::application::{
    DbTypeDescription, Driver, SchemaFile, SchemaScaffolder, ServerPackage, TablesSchema,
};
use crate::core::error::Result;
use crate::infrastructure::node::{
    MODE_DB_TYPE_DESCRIPTION, MODE_DRIVER_DEPENDENCIES, MODE_SCAFFOLD, NodeBridge, NodeDriver,
};

/// `@cubejs-backend/server` and `@cubejs-backend/jdbc-driver`
pub struct NodeServerPackage {
    bridge: NodeBridge,
}

impl NodeServerPackage {
    pub fn new(bridge: NodeBridge) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl ServerPackage for NodeServerPackage {
    async fn driver_dependencies(&self, project_dir: &Path, db_type: &str) -> Result<Vec<String>> {
        self.bridge
            .invoke(project_dir, MODE_DRIVER_DEPENDENCIES, db_type, None)
            .await
    }

    async fn db_type_description(
        &self,
        project_dir: &Path,
        db_type: &str,
    ) -> Result<Option<DbTypeDescription>> {
        self.bridge
            .invoke(project_dir, MODE_DB_TYPE_DESCRIPTION, db_type, None)
            .await
    }

    async fn create_driver(&self, project_dir: &Path) -> Result<Box<dyn Driver>> {
        Ok(Box::new(NodeDriver::spawn(&self.bridge, project_dir).await?))
    }
}

/// `@cubejs-backend/schema-compiler`'s scaffolding template
pub struct NodeScaffolder {
    bridge: NodeBridge,
}

impl NodeScaffolder {
    pub fn new(bridge: NodeBridge) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl SchemaScaffolder for NodeScaffolder {
    async fn generate_files_by_table_names(
        &self,
        project_dir: &Path,
        schema: &TablesSchema,
        table_names: &[String],
    ) -> Result<Vec<SchemaFile>> {
        // Schemas can be large; they go through stdin rather than the environment
        let input = serde_json::to_string(schema)?;
        let tables = serde_json::to_string(table_names)?;
        self.bridge
            .invoke(project_dir, MODE_SCAFFOLD, &tables, Some(input))
            .await
    }
}
