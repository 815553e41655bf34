//! File-backed virtual documents.
//!
//! Two kinds of files are produced:
//! - transient files, uniquely named per request and removed by the caller's
//!   [`Cleanup`](super::Cleanup);
//! - persistent files, one per `(parent, language)` key, overwritten in place
//!   on every request and kept for the lifetime of the session. Files placed
//!   next to the host document are removed when the store is dropped.
//!
//! No lock is held while a persistent file is written. Two concurrent writes
//! for the same key race and the last one wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tempfile::{TempDir, TempPath};
use url::Url;

use super::cleanup::SESSION_DIR_PREFIX;
use super::uri::{VDOC_FILE_PREFIX, fnv1a};
use crate::error::{VdocError, VdocResult};
use crate::vdoc::VirtualDocument;

/// Key of a persistent virtual document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersistentKey {
    pub parent: String,
    pub language: String,
}

impl PersistentKey {
    pub fn new(parent: &Url, language: &str) -> Self {
        Self {
            parent: parent.to_string(),
            language: language.to_string(),
        }
    }
}

/// Where persistent files live when they are not placed next to the host
#[derive(Debug)]
enum SessionDir {
    /// Removed with everything in it when the store is dropped
    Owned(TempDir),
    Borrowed(PathBuf),
}

impl SessionDir {
    fn path(&self) -> &Path {
        match self {
            SessionDir::Owned(dir) => dir.path(),
            SessionDir::Borrowed(path) => path,
        }
    }
}

#[derive(Debug)]
pub(crate) struct TempFileStore {
    session_dir: SessionDir,
    persistent: DashMap<PersistentKey, PathBuf>,
}

impl TempFileStore {
    /// Store with a fresh session directory under the OS temp dir
    pub(crate) fn new() -> VdocResult<Self> {
        let temp_root = std::env::temp_dir();
        let dir = tempfile::Builder::new()
            .prefix(SESSION_DIR_PREFIX)
            .tempdir_in(&temp_root)
            .map_err(|err| VdocError::io(&temp_root, err))?;
        log::debug!(
            target: "vdoc_bridge::resource",
            "Created session directory {}",
            dir.path().display()
        );
        Ok(Self {
            session_dir: SessionDir::Owned(dir),
            persistent: DashMap::new(),
        })
    }

    /// Store using an existing directory the caller owns
    pub(crate) fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            session_dir: SessionDir::Borrowed(dir.into()),
            persistent: DashMap::new(),
        }
    }

    pub(crate) fn session_dir(&self) -> &Path {
        self.session_dir.path()
    }

    /// Write a uniquely named file next to the host document.
    ///
    /// Falls back to the session directory when the parent is not a local
    /// file (e.g. an unsaved buffer).
    pub(crate) async fn create_transient(
        &self,
        vdoc: &VirtualDocument,
        parent: &Url,
    ) -> VdocResult<(Url, TempPath)> {
        let dir = host_dir(parent).unwrap_or_else(|| self.session_dir().to_path_buf());
        let suffix = format!(".{}", vdoc.language().extension());
        let content = vdoc.content().to_string();

        let create_dir = dir.clone();
        let temp_path = tokio::task::spawn_blocking(move || -> std::io::Result<TempPath> {
            let mut file = tempfile::Builder::new()
                .prefix(VDOC_FILE_PREFIX)
                .suffix(&suffix)
                .tempfile_in(&create_dir)?;
            file.write_all(content.as_bytes())?;
            Ok(file.into_temp_path())
        })
        .await
        .map_err(|err| VdocError::io(&dir, std::io::Error::other(err)))?
        .map_err(|err| VdocError::io(&dir, err))?;

        let uri = file_uri(&temp_path)?;
        log::debug!(
            target: "vdoc_bridge::resource",
            "Created transient virtual document {}",
            temp_path.display()
        );
        Ok((uri, temp_path))
    }

    /// Write the persistent file of `(parent, language)`, creating it on first use
    pub(crate) async fn write_persistent(
        &self,
        vdoc: &VirtualDocument,
        parent: &Url,
    ) -> VdocResult<Url> {
        let language = vdoc.language();
        let key = PersistentKey::new(parent, language.name());
        // Entry guard is released before the write below
        let path = self
            .persistent
            .entry(key)
            .or_insert_with(|| {
                let dir = if language.local_temp_file() {
                    host_dir(parent).unwrap_or_else(|| self.session_dir().to_path_buf())
                } else {
                    self.session_dir().to_path_buf()
                };
                dir.join(persistent_file_name(parent, language.name(), language.extension()))
            })
            .clone();

        tokio::fs::write(&path, vdoc.content())
            .await
            .map_err(|err| VdocError::io(&path, err))?;
        log::debug!(
            target: "vdoc_bridge::resource",
            "Wrote persistent virtual document {}",
            path.display()
        );
        file_uri(&path)
    }

    /// Path of the persistent file for a key, if it was ever materialized
    pub(crate) fn persistent_path(&self, key: &PersistentKey) -> Option<PathBuf> {
        self.persistent.get(key).map(|entry| entry.value().clone())
    }

    #[cfg(test)]
    pub(crate) fn persistent_count(&self) -> usize {
        self.persistent.len()
    }
}

impl Drop for TempFileStore {
    fn drop(&mut self) {
        let session_dir = self.session_dir().to_path_buf();
        for entry in self.persistent.iter() {
            let path = entry.value();
            // Session directory contents go with the directory or its owner
            if path.starts_with(&session_dir) {
                continue;
            }
            match std::fs::remove_file(path) {
                Ok(()) => log::debug!(
                    target: "vdoc_bridge::resource",
                    "Removed persistent virtual document {}",
                    path.display()
                ),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => log::warn!(
                    target: "vdoc_bridge::resource",
                    "Failed to remove persistent virtual document {}: {}",
                    path.display(),
                    err
                ),
            }
        }
    }
}

/// `.vdoc.{hash(parent, language)}.{ext}`
fn persistent_file_name(parent: &Url, language: &str, extension: &str) -> String {
    let hash = fnv1a(&[parent.as_str(), language]);
    format!("{VDOC_FILE_PREFIX}{hash:016x}.{extension}")
}

/// Directory containing the host document, for `file:` parents
fn host_dir(parent: &Url) -> Option<PathBuf> {
    if parent.scheme() != "file" {
        return None;
    }
    let path = parent.to_file_path().ok()?;
    path.parent().map(Path::to_path_buf)
}

fn file_uri(path: &Path) -> VdocResult<Url> {
    Url::from_file_path(path)
        .map_err(|_| VdocError::invalid_uri(format!("not an absolute path: {}", path.display())))
}
