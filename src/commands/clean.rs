//! Remove generated files

use anyhow::Result;
use std::fs;

use crate::Blog;

/// Delete the slug manifest
pub fn run(blog: &Blog) -> Result<()> {
    if blog.manifest_path.exists() {
        fs::remove_file(&blog.manifest_path)?;
        tracing::info!("Deleted: {:?}", blog.manifest_path);
    }

    Ok(())
}
