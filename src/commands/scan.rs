//! Discover posts and write the slug manifest

use anyhow::Result;
use std::path::Path;

use crate::content::SlugManifest;
use crate::Blog;

/// Scan the content root and write the manifest to `out` (or the configured path)
pub fn run(blog: &Blog, out: Option<&Path>) -> Result<Vec<String>> {
    let start = std::time::Instant::now();

    let index = blog.index()?;
    let manifest = SlugManifest::from_index(&index);
    let path = out.unwrap_or(blog.manifest_path.as_path());
    manifest.write(path)?;

    tracing::info!(
        "Discovered {} posts in {:.2}s",
        manifest.slugs.len(),
        start.elapsed().as_secs_f64()
    );
    tracing::info!("Manifest written to {:?}", path);

    Ok(manifest.slugs)
}
