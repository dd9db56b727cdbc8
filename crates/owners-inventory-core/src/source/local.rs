//! OWNERS files from a local working tree.

use super::file_walker::{FileWalkerConfig, find_named_files};
use super::{OwnersSource, SourceError};
use crate::OWNERS_FILENAME;
use async_trait::async_trait;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads OWNERS files from a checked-out repository.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
    walker_config: FileWalkerConfig,
}

impl LocalSource {
    /// Creates a source rooted at `root` with default walker settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            walker_config: FileWalkerConfig::default(),
        }
    }

    /// Sets the walker configuration.
    pub fn with_walker_config(mut self, config: FileWalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Returns the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl OwnersSource for LocalSource {
    async fn discover(&self) -> Result<Vec<String>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::Discovery(format!(
                "'{}' is not a directory",
                self.root.display()
            )));
        }

        let root = self.root.clone();
        let config = self.walker_config.clone();
        tokio::task::spawn_blocking(move || find_named_files(&root, OWNERS_FILENAME, &config))
            .await
            .map_err(|e| SourceError::Discovery(format!("file walker failed: {}", e)))?
            .map_err(|e| SourceError::Discovery(e.to_string()))
    }

    async fn fetch(&self, path: &str) -> Result<Option<String>, SourceError> {
        let full_path = self.root.join(path);
        match tokio::fs::read_to_string(&full_path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} disappeared before it could be read", full_path.display());
                Ok(None)
            }
            Err(e) => Err(SourceError::Io(e)),
        }
    }
}
