//! Stub `node_modules` for running the real bridge script under `node`

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use crate::infrastructure::node::NodeBridge;
use crate::infrastructure::shell::ProcessCommandExecutor;

/// Whether a `node` binary is on the PATH; bridge tests are skipped without one
pub fn node_available() -> bool {
    std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

pub fn bridge() -> NodeBridge {
    NodeBridge::new(Arc::new(ProcessCommandExecutor::new()), "node")
}

const SERVER_PACKAGE: &str = r#"
const fs = require('fs');

module.exports = {
  driverDependencies: (dbType) => ({
    postgres: '@cubejs-backend/postgres-driver',
    mysql: ['@cubejs-backend/mysql-driver', 'mysql2'],
    hive: '@cubejs-backend/jdbc-driver',
  })[dbType],
  createDriver: async () => {
    const driver = {
      testConnection: async () => {
        if (process.env.CUBEJS_DB_HOST === 'unreachable') {
          throw new Error('connect ECONNREFUSED 127.0.0.1:5432');
        }
      },
      tablesSchema: async () => {
        console.log('querying information_schema');
        return { public: { orders: [{ name: 'id', type: 'integer' }], customers: [] } };
      },
    };
    if (RELEASE) {
      driver.release = async () => fs.writeFileSync('released', 'yes');
    }
    return driver;
  },
};
"#;

const JDBC_DRIVER: &str = r#"
module.exports = {
  dbTypeDescription: (dbType) => (dbType === 'mysql'
    ? { driverClass: 'com.mysql.jdbc.Driver', mavenDependency: { groupId: 'mysql', artifactId: 'mysql-connector-java', version: '8.0.13' } }
    : undefined),
};
"#;

const SCAFFOLDING_TEMPLATE: &str = r#"
class ScaffoldingTemplate {
  constructor(schema) {
    this.schema = schema;
  }

  generateFilesByTableNames(tables) {
    const padding = this.schema.padding || 0;
    return tables.map((table) => {
      const cube = table.charAt(0).toUpperCase() + table.slice(1);
      return {
        fileName: `${cube}.js`,
        content: `cube(\`${cube}\`, {\n  sql: \`SELECT * FROM public.${table}\`,\n  title: '${'x'.repeat(padding)}'\n});\n`,
      };
    });
  }
}

module.exports = ScaffoldingTemplate;
"#;

/// A project directory with stand-ins for the Cube.js Node packages
pub struct StubProject {
    pub dir: TempDir,
}

impl StubProject {
    /// `with_release` controls whether created drivers expose `release()`
    pub fn new(with_release: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let backend = dir.path().join("node_modules").join("@cubejs-backend");
        write(
            &backend.join("server").join("index.js"),
            &SERVER_PACKAGE.replace("RELEASE", &with_release.to_string()),
        );
        write(
            &backend.join("jdbc-driver").join("driver").join("JDBCDriver.js"),
            JDBC_DRIVER,
        );
        write(
            &backend
                .join("schema-compiler")
                .join("scaffolding")
                .join("ScaffoldingTemplate.js"),
            SCAFFOLDING_TEMPLATE,
        );
        Self { dir }
    }

    /// `None` when there is no `node` to run the bridge with
    pub fn if_node_available(with_release: bool) -> Option<Self> {
        if node_available() {
            Some(Self::new(with_release))
        } else {
            eprintln!("node not found, skipping bridge test");
            None
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
