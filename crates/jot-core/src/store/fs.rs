//! Directory-backed JSON store
//!
//! ```text
//! <root>/index.json                 catalog: [{"name": ..., "kind": ...}]
//! <root>/<bucket>/<entry-id>.json   one entry
//! ```
//!
//! Every write goes to a sibling temporary file that is then renamed into
//! place. Unreadable or corrupt entry files are logged and skipped.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, Mutex};
use walkdir::WalkDir;

use super::{
    layout::{decode_bucket, encode_bucket, entry_file_name, ENTRY_EXTENSION, INDEX_FILE},
    matches_prefix, JournalStore,
};
use crate::{
    config::WatchConfig,
    model::{canonical_name, normalize_name, CollectionKind, CollectionMeta, Entry},
    shutdown::ShutdownSignal,
    watcher::{BucketDecoder, ChangeSignal, CollectionWatcher},
    Error, Result,
};

/// Journal stored as files under one root directory.
pub struct FileStore {
    root: PathBuf,
    /// Serializes catalog read-modify-write cycles.
    catalog: Mutex<()>,
}

impl FileStore {
    /// Open a journal, creating the root directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            Error::io_error(format!(
                "Failed to create journal directory {}: {e}",
                root.display()
            ))
        })?;
        tracing::debug!(root = %root.display(), "opened file store");
        Ok(Self {
            root,
            catalog: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn bucket_dir(&self, collection: &str) -> PathBuf {
        self.root.join(encode_bucket(collection))
    }

    fn entry_path(&self, collection: &str, id: &str) -> PathBuf {
        self.bucket_dir(collection).join(entry_file_name(id))
    }

    /// Decoder handed to watch sessions.
    pub fn bucket_decoder() -> BucketDecoder {
        Arc::new(decode_bucket)
    }

    async fn read_catalog(&self) -> Result<Vec<CollectionMeta>> {
        let path = self.index_path();
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::parse_error(format!("Corrupt catalog {}: {e}", path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::io_error(format!(
                "Failed to read catalog {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write_catalog(&self, metas: &[CollectionMeta]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(metas)?;
        write_atomic(&self.index_path(), &bytes).await
    }

    /// Catalog meta for `name`, created with `kind` (or generic) if missing.
    async fn ensure_in_catalog(
        &self,
        name: &str,
        kind: Option<CollectionKind>,
    ) -> Result<CollectionMeta> {
        let name = canonical_name(name);
        if name.is_empty() {
            return Err(Error::invalid_input("collection name is empty"));
        }

        let _guard = self.catalog.lock().await;
        let mut metas = self.read_catalog().await?;
        let key = normalize_name(&name);
        if let Some(existing) = metas.iter().find(|meta| meta.key() == key) {
            return Ok(existing.clone());
        }

        let meta = CollectionMeta::new(&name, kind.unwrap_or_default());
        metas.push(meta.clone());
        self.write_catalog(&metas).await?;
        tokio::fs::create_dir_all(self.bucket_dir(&meta.name)).await?;
        tracing::info!(collection = %meta.name, kind = %meta.kind, "created collection");
        Ok(meta)
    }

    async fn read_bucket(&self, dir: &Path) -> Result<Vec<Entry>> {
        let mut reader = match tokio::fs::read_dir(dir).await {
            Ok(reader) => reader,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::io_error(format!(
                    "Failed to list {}: {e}",
                    dir.display()
                )))
            }
        };

        let mut entries = Vec::new();
        while let Some(item) = reader.next_entry().await? {
            let path = item.path();
            if !is_entry_file(&path) {
                continue;
            }
            if let Some(entry) = read_entry(&path).await {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl JournalStore for FileStore {
    async fn list_entries(&self, collection: &str) -> Result<Vec<Entry>> {
        let name = self
            .read_catalog()
            .await?
            .into_iter()
            .find(|meta| meta.key() == normalize_name(collection))
            .map_or_else(|| canonical_name(collection), |meta| meta.name);
        self.read_bucket(&self.bucket_dir(&name)).await
    }

    async fn list_all_entries(&self) -> Result<Vec<Entry>> {
        let root = self.root.clone();
        let paths = tokio::task::spawn_blocking(move || {
            WalkDir::new(&root)
                .min_depth(2)
                .max_depth(2)
                .into_iter()
                .filter_map(|item| match item {
                    Ok(item) => Some(item.into_path()),
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping unreadable path");
                        None
                    }
                })
                .filter(|path| is_entry_file(path))
                .collect::<Vec<_>>()
        })
        .await
        .map_err(|e| Error::io_error(format!("Failed to scan journal: {e}")))?;

        let mut entries = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(entry) = read_entry(&path).await {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    async fn list_collection_metas(&self, prefix: &str) -> Result<Vec<CollectionMeta>> {
        Ok(self
            .read_catalog()
            .await?
            .into_iter()
            .filter(|meta| matches_prefix(&meta.name, prefix))
            .collect())
    }

    async fn store(&self, entry: &Entry) -> Result<()> {
        let meta = self.ensure_in_catalog(&entry.collection, None).await?;
        let dir = self.bucket_dir(&meta.name);
        tokio::fs::create_dir_all(&dir).await?;

        let mut stored = entry.clone();
        stored.collection.clone_from(&meta.name);
        let bytes = serde_json::to_vec_pretty(&stored)?;
        write_atomic(&self.entry_path(&meta.name, &entry.id), &bytes).await?;
        tracing::debug!(collection = %meta.name, id = %entry.id, "stored entry");
        Ok(())
    }

    async fn delete(&self, entry: &Entry) -> Result<()> {
        let name = self
            .read_catalog()
            .await?
            .into_iter()
            .find(|meta| meta.key() == normalize_name(&entry.collection))
            .map_or_else(|| canonical_name(&entry.collection), |meta| meta.name);
        match tokio::fs::remove_file(self.entry_path(&name, &entry.id)).await {
            Ok(()) => {
                tracing::debug!(collection = %name, id = %entry.id, "deleted entry");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_collection(
        &self,
        name: &str,
        kind: Option<CollectionKind>,
    ) -> Result<CollectionMeta> {
        self.ensure_in_catalog(name, kind).await
    }

    async fn set_collection_kind(&self, name: &str, kind: CollectionKind) -> Result<()> {
        let _guard = self.catalog.lock().await;
        let mut metas = self.read_catalog().await?;
        let key = normalize_name(name);
        let meta = metas
            .iter_mut()
            .find(|meta| meta.key() == key)
            .ok_or_else(|| Error::not_found(format!("collection {name}")))?;
        meta.kind = kind;
        self.write_catalog(&metas).await
    }

    async fn watch(
        &self,
        config: &WatchConfig,
        shutdown: broadcast::Receiver<ShutdownSignal>,
    ) -> Result<mpsc::Receiver<ChangeSignal>> {
        CollectionWatcher::new(&self.root, Self::bucket_decoder()).start(config, shutdown)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn is_entry_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION)
        && path.file_name().and_then(|name| name.to_str()) != Some(INDEX_FILE)
}

/// Read one entry file; failures are logged and yield `None`.
async fn read_entry(path: &Path) -> Option<Entry> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
            return None;
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping corrupt entry");
            None
        }
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, bytes)
        .await
        .map_err(|e| Error::io_error(format!("Failed to write {}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| Error::io_error(format!("Failed to replace {}: {e}", path.display())))
}
