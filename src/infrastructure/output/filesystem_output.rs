//! Filesystem-based output service implementation

use async_trait::async_trait;
use futures::future::try_join_all;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::application::OutputService;
use crate::core::error::Result;
use crate::core::templates::Artifact;

/// Output service that writes artifacts to the filesystem
#[derive(Debug)]
pub struct FileSystemOutputService;

impl FileSystemOutputService {
    pub fn new() -> Self {
        Self
    }

    async fn write_artifact(artifact: &Artifact) -> Result<()> {
        if let Some(parent) = artifact.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&artifact.path, artifact.content.as_bytes()).await?;
        debug!(path = %artifact.path.display(), bytes = artifact.content.len(), "Wrote file");
        Ok(())
    }
}

#[async_trait]
impl OutputService for FileSystemOutputService {
    async fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<()> {
        // Every artifact has a distinct path, so the writes can run concurrently
        try_join_all(artifacts.iter().map(Self::write_artifact)).await?;
        Ok(())
    }

    async fn ensure_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await?;
        Ok(())
    }
}

impl Default for FileSystemOutputService {
    fn default() -> Self {
        Self::new()
    }
}
