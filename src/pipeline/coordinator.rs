//! Input discovery for batch classification.

use crate::error::Result;
use crate::pipeline::upload::is_image_file;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Collect input files from paths (files and directories).
///
/// Files named explicitly are kept whatever their extension so that a
/// non-image upload is reported instead of silently dropped. Directories
/// are searched recursively for image files, in sorted order.
pub fn collect_input_images(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            collect_images_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

/// Recursively collect image files from a directory.
fn collect_images_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_images_recursive(&path, files)?;
        } else if is_image_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}
