//! In-memory key-value store for tests.

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use super::KeyValueStore;

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry without going through the async trait, for test setup.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries
            .try_lock()
            .expect("store not shared yet")
            .insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
