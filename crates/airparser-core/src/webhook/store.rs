//! Per-trigger key-value storage for the subscription id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::TRACING_TARGET;
use crate::{Error, Result};

/// Key under which the subscription id is stored.
pub const HOOK_ID_KEY: &str = "hookId";

/// A small persistent key-value slot scoped to one trigger instance.
#[async_trait::async_trait]
pub trait StaticDataStore: Send + Sync {
    /// Returns the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`, returning the previous value.
    async fn remove(&self, key: &str) -> Result<Option<String>>;
}

#[async_trait::async_trait]
impl<T: StaticDataStore + ?Sized> StaticDataStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<Option<String>> {
        (**self).remove(key).await
    }
}

/// In-memory store; contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StaticDataStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.write().await.remove(key))
    }
}

/// Store persisted as a JSON object in a single file.
///
/// A missing file reads as an empty store. Writes go to a sibling temporary
/// file that is then renamed over the original.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`; the file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::from(e).with_context(self.path.display().to_string())
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(Error::from(e).with_context(self.path.display().to_string())),
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");

        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::trace!(
            target: TRACING_TARGET,
            path = %self.path.display(),
            entries = entries.len(),
            "Persisted static data"
        );

        Ok(())
    }
}

#[async_trait::async_trait]
impl StaticDataStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        let previous = entries.remove(key);
        if previous.is_some() {
            self.save(&entries).await?;
        }
        Ok(previous)
    }
}
