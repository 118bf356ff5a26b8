//! Append-only record of successful reuploads, mirrored to a JSON file.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::entities::LibraryEntry;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("library io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("library file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize library: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Library backed by a pretty-printed JSON array.
///
/// Appends hold the lock across the file write, so the in-memory entries and
/// the file on disk are equal whenever the lock is free.
#[derive(Debug)]
pub struct LibraryStore {
    path: PathBuf,
    entries: Mutex<Vec<LibraryEntry>>,
}

impl LibraryStore {
    /// Load the library, creating the file as an empty array if missing.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let path = path.into();

        let entries = match tokio::fs::read(&path).await {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|source| LibraryError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: Vec<LibraryEntry> = Vec::new();
                write_atomic(&path, &empty).await?;
                info!(path = %path.display(), "created empty library");
                empty
            }
            Err(source) => return Err(LibraryError::Io { path, source }),
        };

        info!(path = %path.display(), entries = entries.len(), "library loaded");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush the whole library before returning.
    /// If the flush fails the entry is dropped again.
    pub async fn append(&self, entry: LibraryEntry) -> Result<(), LibraryError> {
        let mut entries = self.entries.lock().await;
        entries.push(entry);

        if let Err(e) = write_atomic(&self.path, &entries).await {
            entries.pop();
            return Err(e);
        }

        debug!(entries = entries.len(), "library flushed");
        Ok(())
    }

    /// Snapshot of the current entries in append order.
    pub async fn entries(&self) -> Vec<LibraryEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

async fn write_atomic(path: &Path, entries: &[LibraryEntry]) -> Result<(), LibraryError> {
    let json = serde_json::to_vec_pretty(entries)?;
    let tmp = path.with_extension("json.tmp");

    let io_err = |source: std::io::Error| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    };
    tokio::fs::write(&tmp, json).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    Ok(())
}
