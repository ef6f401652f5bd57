//! Persisted local key-value state.
//!
//! Holds the few strings that survive a restart (`auth_token`, the error
//! reporting user ID). Access never fails from the caller's point of view:
//! unreadable state reads as absent and failed writes are dropped with a
//! warning. Concurrent writers race; the last write wins.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

/// Key holding the session auth token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Key holding the user ID attached to error reports.
pub const USER_ID_KEY: &str = "error_reporting_user_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store format error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String key-value store shared across the process.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Fire-and-forget write.
    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);
}

/// Volatile store, for tests and read-only deployments.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

/// Store persisted as a flat JSON object, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<DashMap<String, String>>,
    path: PathBuf,
}

impl FileStore {
    /// Open the store, loading existing state if the file exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = DashMap::new();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let map: HashMap<String, String> = serde_json::from_reader(reader)?;
            for (k, v) in map {
                inner.insert(k, v);
            }
            tracing::debug!(path = %path.display(), keys = inner.len(), "Loaded local state");
        }

        Ok(Self {
            inner: Arc::new(inner),
            path,
        })
    }

    /// Open the store, falling back to an empty one if the file is unreadable.
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Local state unreadable, starting empty");
            Self {
                inner: Arc::new(DashMap::new()),
                path: path.to_path_buf(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> StoreResult<()> {
        let map: HashMap<String, String> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Readers only ever see a complete file: write a sibling, then rename.
        let tmp = self.temp_sibling();
        let result = Self::write_json(&tmp, &map).and_then(|()| {
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        });
        if result.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        result
    }

    fn write_json(path: &Path, map: &HashMap<String, String>) -> StoreResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, map)?;
        writer.flush()?;
        Ok(())
    }

    fn temp_sibling(&self) -> PathBuf {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(
            ".{}.{}.tmp",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        self.path.with_file_name(name)
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist local state");
        }
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.inner.insert(key.to_string(), value.to_string());
        self.persist_or_warn();
    }

    fn remove(&self, key: &str) {
        if self.inner.remove(key).is_some() {
            self.persist_or_warn();
        }
    }
}
