//! Slugs: the identifiers that match image files to manifest entries.

use std::path::Path;

/// Derive a slug from a display name: lowercase, with spaces and
/// underscores replaced by hyphens.
///
/// ```
/// use asterism_io::slug::slugify;
///
/// assert_eq!(slugify("Canes Venatici"), "canes-venatici");
/// assert_eq!(slugify("Corona_Borealis"), "corona-borealis");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase().replace([' ', '_'], "-")
}

/// Slug of a file name with its extension removed.
///
/// Returns `None` when the path has no UTF-8 file stem.
#[must_use]
pub fn slugify_file_name(path: &Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(slugify)
}
