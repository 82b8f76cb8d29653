//! Slug manifest
//!
//! The discovered slug list written out as JSON, so a static front end can
//! import it without reading the content root itself.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::ContentIndex;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to access manifest {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Serialized form of a [`ContentIndex`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugManifest {
    /// RFC 3339 timestamp of the scan
    pub generated_at: String,
    /// Sorted slugs
    pub slugs: Vec<String>,
}

impl SlugManifest {
    /// Snapshot the index as it is now
    pub fn from_index(index: &ContentIndex) -> Self {
        Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            slugs: index.slugs().to_vec(),
        }
    }

    /// Load a manifest from disk
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the manifest, creating parent directories as needed
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        let io_err = |source: io::Error| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)?;

        tracing::debug!("Wrote manifest {:?} ({} slugs)", path, self.slugs.len());
        Ok(())
    }

    /// Turn the manifest back into an index over `root`
    pub fn into_index<P: AsRef<Path>>(self, root: P) -> ContentIndex {
        ContentIndex::from_slugs(root, self.slugs)
    }
}
