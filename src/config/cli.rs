use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Absolute paths are used as-is, relative ones resolve under the base.
    pub fn resolve(&self, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(full_path, data).await?;
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }
}
