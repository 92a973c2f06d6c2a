use super::Store;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file store format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// A durable [`Store`] of string pairs, kept as a single JSON object on disk.
///
/// A missing file reads as an empty store. Every write rewrites the whole file
/// through a sibling temporary file.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a new [`FileStore`] backed by the file at the given path.
    ///
    /// The file is not touched until the first operation.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), lock: Mutex::new(()) }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    fn read(&self) -> Result<BTreeMap<String, String>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) if s.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(s) => Ok(serde_json::from_str(&s)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
    fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store<String, String> for FileStore {
    type Error = Error;

    async fn get(&self, key: &String) -> Result<Option<String>, Self::Error> {
        let _guard = self.lock.lock().await;
        Ok(self.read()?.remove(key))
    }
    async fn set(&self, key: String, value: String) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read()?;
        entries.insert(key, value);
        self.write(&entries)
    }
    async fn del(&self, key: &String) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read()?;
        if entries.remove(key).is_some() {
            self.write(&entries)?;
        }
        Ok(())
    }
    async fn clear(&self) -> Result<(), Self::Error> {
        let _guard = self.lock.lock().await;
        self.write(&BTreeMap::new())
    }
}
