//! Image discovery: map slugs to the figure images in a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::IoError;
use crate::slug::slugify_file_name;

/// Extension (case-insensitive) of the figure images.
pub const IMAGE_EXTENSION: &str = "png";

/// List the `.png` files directly inside `dir`, keyed by slug.
///
/// Files are visited in name order; when two files share a slug the
/// first one is kept and the other is logged and ignored.
///
/// # Errors
///
/// Returns [`IoError::ImagesDir`] if `dir` cannot be listed.
pub fn discover_images(dir: &Path) -> Result<BTreeMap<String, PathBuf>, IoError> {
    let list_err = |source: std::io::Error| IoError::ImagesDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let path = entry.map_err(list_err)?.path();
        if path.is_file() && has_image_extension(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut images: BTreeMap<String, PathBuf> = BTreeMap::new();
    for path in paths {
        let Some(slug) = slugify_file_name(&path) else {
            log::warn!("skipping image with non-UTF-8 name: {}", path.display());
            continue;
        };
        if let Some(existing) = images.get(&slug) {
            log::warn!(
                "{} has the same slug '{slug}' as {}; ignoring it",
                path.display(),
                existing.display(),
            );
            continue;
        }
        images.insert(slug, path);
    }

    log::debug!("found {} images in {}", images.len(), dir.display());
    Ok(images)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(IMAGE_EXTENSION))
}
