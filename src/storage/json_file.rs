//! File-backed key-value store.
//!
//! All entries live in a single `cache.json` object under the base
//! directory. An absent file reads as an empty store; a corrupt file is
//! treated the same way and overwritten by the next `set`, since the
//! cache only ever holds re-fetchable data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use super::KeyValueStore;

const CACHE_FILE: &str = "cache.json";

pub struct JsonFileStore {
    base_path: PathBuf,
    // Serializes read-modify-write cycles on the cache file.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn cache_file(&self) -> PathBuf {
        self.base_path.join(CACHE_FILE)
    }

    async fn read_entries(&self) -> Result<HashMap<String, String>> {
        let path = self.cache_file();
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cache file unreadable, starting empty");
                Ok(HashMap::new())
            }
        }
    }

    async fn write_entries(&self, entries: &HashMap<String, String>) -> Result<()> {
        let path = self.cache_file();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create cache directory")?;
        }

        let content = serde_json::to_string_pretty(entries).context("Failed to serialize cache")?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.read_entries().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }
}
