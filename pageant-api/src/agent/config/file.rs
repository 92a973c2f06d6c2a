use super::{Config, Loader, Saver};
use anyhow::anyhow;
use std::path::{Path, PathBuf};

/// An implementation of [`Loader`] and [`Saver`] that reads and writes a configuration file.
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Create a new [`ConfigFile`] with the given path.
    ///
    /// The format is chosen by the file extension. Only `.json` is supported.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for ConfigFile {
    async fn load(
        &self,
    ) -> core::result::Result<Config, Box<dyn std::error::Error + Send + Sync + 'static>> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&std::fs::read_to_string(&self.path)?)?),
            _ => Err(anyhow!("Unsupported file format").into()),
        }
    }
}

impl Saver for ConfigFile {
    async fn save(
        &self,
        config: &Config,
    ) -> core::result::Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
        match self.path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                if let Some(parent) = self.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                Ok(std::fs::write(&self.path, serde_json::to_string_pretty(config)?)?)
            }
            _ => Err(anyhow!("Unsupported file format").into()),
        }
    }
}
