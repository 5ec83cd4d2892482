//! Key-value store seam for the persisted configuration blob
//!
//! The portal owns persistence. This crate only needs `get`/`set` over
//! serialized strings with last-write-wins semantics.

use super::error::{ConfigError, ConfigResult};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Store key under which the AI configuration blob lives
pub const AI_CONFIG_KEY: &str = "devcenter_ai_config";

/// Key-value store holding serialized blobs
pub trait ConfigStore: Send + Sync {
    /// Read a blob; `None` when the key was never written
    fn get(&self, key: &str) -> ConfigResult<Option<String>>;

    /// Replace a blob wholesale
    fn set(&self, key: &str, value: &str) -> ConfigResult<()>;
}

/// In-process store, mainly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(key.into(), value.into());
        }
        store
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store writing one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    dir: PathBuf,
}

impl FileConfigStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::IoError {
                path: path.to_string_lossy().to_string(),
                source: e,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> ConfigResult<()> {
        let io_error = |path: &Path, source: std::io::Error| ConfigError::IoError {
            path: path.to_string_lossy().to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(|e| io_error(self.dir.as_path(), e))?;

        // Write then rename so readers never observe a half-written blob
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value).map_err(|e| io_error(tmp.as_path(), e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(path.as_path(), e))?;
        Ok(())
    }
}
