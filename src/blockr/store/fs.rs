use super::KeyValueStore;
use crate::error::{BlockrError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const DEFAULT_STORAGE_FILE: &str = "storage.json";

type Entries = BTreeMap<String, String>;

/// File-backed key-value store.
///
/// All keys live in a single JSON object file under `root`. Every mutation
/// reads the file, applies the change and writes it back through a temp file
/// plus rename, so a crash never leaves a half-written store behind. Mutations
/// are serialized by an internal lock. Reads go straight to disk.
pub struct FileStore {
    root: PathBuf,
    file_name: String,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file_name: DEFAULT_STORAGE_FILE.to_string(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_file_name(mut self, name: &str) -> Self {
        self.file_name = name.to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }

    async fn read_entries(&self) -> Result<Entries> {
        let content = match fs::read_to_string(self.path()).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(BlockrError::Io(e)),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content).map_err(|source| BlockrError::CorruptStore {
            path: self.path(),
            source,
        })
    }

    async fn write_entries(&self, entries: &Entries) -> Result<()> {
        fs::create_dir_all(&self.root).await.map_err(BlockrError::Io)?;

        let content = serde_json::to_string_pretty(entries).map_err(BlockrError::Serialization)?;

        // Atomic write
        let tmp_file = self.root.join(format!(".storage-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).await.map_err(BlockrError::Io)?;
        if let Err(e) = fs::rename(&tmp_file, self.path()).await {
            let _ = fs::remove_file(&tmp_file).await;
            return Err(BlockrError::Io(e));
        }
        Ok(())
    }

    async fn mutate<F>(&self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Entries) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        apply(&mut entries);
        self.write_entries(&entries).await
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
        .await
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        self.mutate(|entries| {
            for key in keys {
                entries.remove(*key);
            }
        })
        .await
    }

    async fn get_all_keys(&self) -> Result<Vec<String>> {
        Ok(self.read_entries().await?.into_keys().collect())
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>> {
        let entries = self.read_entries().await?;
        Ok(keys
            .iter()
            .map(|k| (k.clone(), entries.get(k).cloned()))
            .collect())
    }
}
