//! The abstract document repository and its two backends.
//!
//! Entity stores depend only on [`DocumentStore`], so anything that can hold
//! named JSON documents works: the file backend for production, the memory
//! backend for tests.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::RwLock;

use atelier_core::errors::{AtelierError, AtelierResult};

/// Key-value store of raw JSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, id: &str) -> AtelierResult<Option<Vec<u8>>>;
    async fn put(&self, id: &str, bytes: &[u8]) -> AtelierResult<()>;
    /// Returns `true` when a document was actually removed.
    async fn delete(&self, id: &str) -> AtelierResult<bool>;
    /// Ids starting with `prefix`, in lexicographic order.
    async fn list(&self, prefix: &str) -> AtelierResult<Vec<String>>;
    async fn exists(&self, id: &str) -> AtelierResult<bool>;
}

pub(crate) fn encode<T: Serialize>(id: &str, value: &T) -> AtelierResult<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|source| AtelierError::Encode {
        id: id.to_string(),
        source,
    })
}

pub(crate) fn decode<T: DeserializeOwned>(id: &str, bytes: &[u8]) -> AtelierResult<T> {
    serde_json::from_slice(bytes).map_err(|source| AtelierError::Decode {
        id: id.to_string(),
        source,
    })
}

/// Directory of `<id>.json` files.
///
/// Writes land in a sibling `.tmp` file first and are renamed into place, so
/// readers never observe a partially written document.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub async fn new(dir: impl Into<PathBuf>) -> AtelierResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self, id: &str) -> AtelierResult<Option<Vec<u8>>> {
        match fs::read(self.path(id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn put(&self, id: &str, bytes: &[u8]) -> AtelierResult<()> {
        let path = self.path(id);
        let tmp = self.dir.join(format!("{id}.json.tmp"));
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> AtelierResult<bool> {
        match fs::remove_file(self.path(id)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, prefix: &str) -> AtelierResult<Vec<String>> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(id) = name.strip_suffix(".json") else {
                continue;
            };
            if id.starts_with(prefix) {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    async fn exists(&self, id: &str) -> AtelierResult<bool> {
        Ok(fs::try_exists(self.path(id)).await?)
    }
}

/// In-memory backend, the repository fake used throughout the tests.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> AtelierResult<Option<Vec<u8>>> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn put(&self, id: &str, bytes: &[u8]) -> AtelierResult<()> {
        self.docs
            .write()
            .await
            .insert(id.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, id: &str) -> AtelierResult<bool> {
        Ok(self.docs.write().await.remove(id).is_some())
    }

    async fn list(&self, prefix: &str) -> AtelierResult<Vec<String>> {
        let mut ids: Vec<String> = self
            .docs
            .read()
            .await
            .keys()
            .filter(|id| id.starts_with(prefix))
            .cloned()
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn exists(&self, id: &str) -> AtelierResult<bool> {
        Ok(self.docs.read().await.contains_key(id))
    }
}
