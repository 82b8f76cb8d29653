//! Where post files come from
//!
//! The resolver never touches the filesystem directly; it goes through a
//! [`ContentSource`], which makes the transport swappable and countable.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Per-post entry file
pub const INDEX_FILE: &str = "index.md";

/// Optional per-post stylesheet
pub const STYLES_FILE: &str = "styles.css";

/// Per-post media folder
pub const ASSETS_DIR: &str = "assets";

/// Failure to fetch one file of one post
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Transport for files under `{content_root}/{slug}/`
pub trait ContentSource: Send + Sync {
    /// Fetch a post file as text
    fn fetch(
        &self,
        slug: &str,
        file: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Lightweight existence check; any failure reads as `false`
    fn probe(&self, slug: &str, file: &str) -> impl Future<Output = bool> + Send;
}

/// Reads posts straight from the content root on disk
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, slug: &str, file: &str) -> PathBuf {
        self.root.join(slug).join(file)
    }
}

impl ContentSource for FsSource {
    async fn fetch(&self, slug: &str, file: &str) -> Result<String, FetchError> {
        let path = self.path(slug, file);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            let path = path.display().to_string();
            match e.kind() {
                io::ErrorKind::NotFound => FetchError::NotFound { path },
                _ => FetchError::Io { path, source: e },
            }
        })
    }

    async fn probe(&self, slug: &str, file: &str) -> bool {
        let path = self.path(slug, file);
        match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.is_file(),
            Err(e) => {
                tracing::debug!("Probe {:?} failed: {}", path, e);
                false
            }
        }
    }
}
