//! Object storage for uploaded project media.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::domain::types::MediaUrl;
use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Stores uploaded bytes and hands back a public URL.
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` under the relative `path`.
    fn upload(&self, path: &str, bytes: &[u8]) -> RepositoryResult<MediaUrl>;
    /// Removes the object behind `url`. Unknown URLs are ignored.
    fn remove(&self, url: &MediaUrl) -> RepositoryResult<()>;
}

/// Files below a local directory, served under a URL prefix.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: format!("/{}", url_prefix.trim_matches('/')),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> RepositoryResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || relative.as_os_str().is_empty() {
            return Err(RepositoryError::ValidationError(format!(
                "invalid object path: {path}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStorage for LocalObjectStorage {
    fn upload(&self, path: &str, bytes: &[u8]) -> RepositoryResult<MediaUrl> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, bytes)?;

        MediaUrl::new(format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
        .map_err(|e| RepositoryError::ValidationError(e.to_string()))
    }

    fn remove(&self, url: &MediaUrl) -> RepositoryResult<()> {
        let prefix = format!("{}/", self.url_prefix.trim_end_matches('/'));
        let Some(path) = url.as_str().strip_prefix(&prefix) else {
            log::debug!("Skipping removal of external media {url}");
            return Ok(());
        };

        match fs::remove_file(self.resolve(path)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
