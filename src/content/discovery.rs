//! Content discovery - finds post folders under the content root
//!
//! A slug is any immediate sub-directory of the root that holds an
//! `index.md` file. The current slug list lives in a [`ContentIndex`],
//! which is built once at startup, handed to the resolver, and refreshed
//! by swapping in a freshly scanned list.

use arc_swap::ArcSwap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use walkdir::WalkDir;

use super::source::INDEX_FILE;

/// The content root exists but cannot be listed
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("content root {path:?} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Scan `root` for post folders
///
/// Returns the slugs sorted lexicographically. A missing root is not an
/// error and yields an empty list; folders without `index.md` are skipped.
pub fn scan(root: &Path) -> Result<Vec<String>, DiscoveryError> {
    let unreadable = |source: io::Error| DiscoveryError::Unreadable {
        path: root.to_path_buf(),
        source,
    };

    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            tracing::debug!("Content root {:?} is not a directory", root);
            return Ok(Vec::new());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Content root {:?} does not exist", root);
            return Ok(Vec::new());
        }
        Err(e) => return Err(unreadable(e)),
    }

    let mut slugs = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            // Listing the root itself failed
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory walk failed"));
                return Err(unreadable(source));
            }
            Err(e) => {
                tracing::debug!("Skipping entry in {:?}: {}", root, e);
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            continue;
        }

        if !entry.path().join(INDEX_FILE).is_file() {
            tracing::debug!("Skipping {:?}: no {}", entry.path(), INDEX_FILE);
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => slugs.push(name.to_string()),
            None => tracing::warn!("Skipping non UTF-8 folder name {:?}", entry.file_name()),
        }
    }

    slugs.sort();
    slugs.dedup();

    tracing::debug!("Discovered {} posts in {:?}", slugs.len(), root);
    Ok(slugs)
}

/// The authoritative set of known slugs for one content root
///
/// Readers take cheap snapshots; [`refresh`](Self::refresh) replaces the whole
/// list at once, so a reader never observes a half-updated sequence.
#[derive(Debug)]
pub struct ContentIndex {
    root: PathBuf,
    slugs: ArcSwap<Vec<String>>,
}

impl ContentIndex {
    /// Build the index by scanning `root`
    pub fn scan<P: AsRef<Path>>(root: P) -> Result<Self, DiscoveryError> {
        let root = root.as_ref().to_path_buf();
        let slugs = scan(&root)?;
        Ok(Self {
            root,
            slugs: ArcSwap::from_pointee(slugs),
        })
    }

    /// Build the index from a known slug list (a manifest, or a fixture)
    pub fn from_slugs<P, I, S>(root: P, slugs: I) -> Self
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut slugs: Vec<String> = slugs.into_iter().map(Into::into).collect();
        slugs.sort();
        slugs.dedup();
        Self {
            root: root.as_ref().to_path_buf(),
            slugs: ArcSwap::from_pointee(slugs),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot of the current slug list
    pub fn slugs(&self) -> Arc<Vec<String>> {
        self.slugs.load_full()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs
            .load()
            .binary_search_by(|s| s.as_str().cmp(slug))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.slugs.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.load().is_empty()
    }

    /// Re-scan the root and publish the new list
    ///
    /// Returns whether the slug set changed. On error the previous list stays.
    pub fn refresh(&self) -> Result<bool, DiscoveryError> {
        let fresh = Arc::new(scan(&self.root)?);
        let previous = self.slugs.swap(Arc::clone(&fresh));
        let changed = previous != fresh;
        if changed {
            tracing::info!("Content index refreshed: {} posts", fresh.len());
        }
        Ok(changed)
    }
}
