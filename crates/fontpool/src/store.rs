//! Durable key-value configuration store.
//!
//! Values are plain JSON records; the store survives process restarts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{FontError, Result};

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if nothing was saved.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &Value) -> Result<()>;
}

/// File-backed store keeping one pretty-printed JSON file per key.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    root: PathBuf,
}

impl FileConfigStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|err| FontError::Serialization(format!("{}: {err}", path.display())))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.key_path(key)?;
        self.ensure_root().await?;
        let serialized = serde_json::to_vec_pretty(value)
            .map_err(|err| FontError::Serialization(err.to_string()))?;
        tokio::fs::write(&path, serialized).await?;
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key == "." || key == ".." {
        return Err(FontError::InvalidKey(key.to_string()));
    }
    if key.contains('/') || key.contains('\\') {
        return Err(FontError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// In-memory store. Loses everything on drop; intended for tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    data: Mutex<HashMap<String, Value>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.data.lock().insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_and_reads_json() {
        let dir = tempdir().expect("tempdir");
        let store = FileConfigStore::new(dir.path().to_path_buf());
        let value = serde_json::json!({ "directories": ["/fonts"] });
        store.set("fonts_configuration", &value).await.expect("set");
        let loaded = store
            .get("fonts_configuration")
            .await
            .expect("get")
            .expect("value");
        assert_eq!(value, loaded);
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let dir = tempdir().expect("tempdir");
        let store = FileConfigStore::new(dir.path().to_path_buf());
        let loaded = store.get("never_written").await.expect("get");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn invalid_key_rejected() {
        let dir = tempdir().expect("tempdir");
        let store = FileConfigStore::new(dir.path().to_path_buf());
        let err = store
            .set("../escape", &serde_json::json!(1))
            .await
            .expect_err("invalid key");
        assert!(matches!(err, FontError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryConfigStore::new();
        assert!(store.get("k").await.unwrap().is_none());
        store.set("k", &serde_json::json!({ "n": 1 })).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(serde_json::json!({ "n": 1 })));
    }
}
