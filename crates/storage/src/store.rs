//! Snapshot stores.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flowdesk_flow::SerializedGraph;
use parking_lot::RwLock;

use crate::error::StorageError;

/// Storage key used when none is configured.
pub const DEFAULT_KEY: &str = "flowchart";

/// Persistence backend for snapshots, addressed by key.
///
/// Writes are whole-document: saving a key replaces what was there.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the snapshot under `key`, `None` if nothing is stored.
    async fn load(&self, key: &str) -> Result<Option<SerializedGraph>, StorageError>;

    /// Store `snapshot` under `key`.
    async fn save(&self, key: &str, snapshot: &SerializedGraph) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Every stored key, sorted.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// Reject keys that are empty, hidden or not plain file names.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let plain = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if key.is_empty() || key.starts_with('.') || !plain {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn encode(key: &str, snapshot: &SerializedGraph) -> Result<String, StorageError> {
    serde_json::to_string_pretty(snapshot).map_err(|e| StorageError::json(key, e))
}

fn decode(key: &str, json: &str) -> Result<SerializedGraph, StorageError> {
    serde_json::from_str(json).map_err(|e| StorageError::json(key, e))
}

/// Process-local store. Documents are kept as JSON text so that loading
/// goes through the same parser as a file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw JSON under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: impl Into<String>, json: impl Into<String>) {
        self.documents.write().insert(key.into(), json.into());
    }

    /// Raw JSON under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.documents.read().get(key).cloned()
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<SerializedGraph>, StorageError> {
        validate_key(key)?;
        let json = self.documents.read().get(key).cloned();
        json.map(|json| decode(key, &json)).transpose()
    }

    async fn save(&self, key: &str, snapshot: &SerializedGraph) -> Result<(), StorageError> {
        validate_key(key)?;
        let json = encode(key, snapshot)?;
        self.documents.write().insert(key.to_string(), json);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        self.documents.write().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.documents.read().keys().cloned().collect())
    }
}

/// Store writing `<dir>/<key>.json`.
///
/// Saves go through a temporary file and a rename, so a crash mid-write
/// leaves the previous document in place.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SnapshotStore for DirectoryStore {
    async fn load(&self, key: &str) -> Result<Option<SerializedGraph>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(json) => {
                let snapshot = decode(key, &json)?;
                tracing::info!(path = %path.display(), nodes = snapshot.nodes.len(), "snapshot loaded");
                Ok(Some(snapshot))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn save(&self, key: &str, snapshot: &SerializedGraph) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let json = encode(key, snapshot)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StorageError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        tracing::info!(path = %path.display(), nodes = snapshot.nodes.len(), "snapshot saved");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(&self.dir, e)),
        };
        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?
        {
            let name = entry.file_name();
            if let Some(key) = name.to_str().and_then(|n| n.strip_suffix(".json"))
                && validate_key(key).is_ok()
            {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
