use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes rendered outputs below a base directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.base_path.join(path);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::debug!("Writing {}", target.display());
        fs::write(target, data)?;
        Ok(())
    }
}
