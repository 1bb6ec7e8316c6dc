//! Batch runners: apply a pipeline stage to every entry of a manifest.
//!
//! Each run follows the same shape:
//!
//! 1. Validate the configuration.
//! 2. Ensure the stage's one-time backup exists (skipped on dry runs).
//! 3. Load the manifest and process entries one at a time, in order.
//! 4. Save the manifest (skipped on dry runs) and return a summary.
//!
//! Per-entry failures are logged and counted; only problems with the
//! data file itself or the backup stop a batch.

use std::fmt;
use std::path::{Path, PathBuf};

use asterism_pipeline::payload::{STROKES_KEY, strokes_value};
use asterism_pipeline::{
    ExtractConfig, SimplifyConfig, SimplifyOutcome, extract_strokes, simplify_entry,
};
use serde_json::{Map, Value};

use crate::backup::{Checkpoint, Stage};
use crate::error::IoError;
use crate::images::discover_images;
use crate::manifest::{Manifest, entry_key};

/// Counts from one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Entry records seen.
    pub total: usize,
    /// Entries whose strokes were written.
    pub updated: usize,
    /// Entries left without new strokes: no identifier, no matching
    /// image, or no points.
    pub skipped: usize,
    /// Entries whose image could not be read or decoded, or whose
    /// stored payload was malformed.
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries: {} updated, {} skipped, {} failed",
            self.total, self.updated, self.skipped, self.failed,
        )
    }
}

/// Inputs for [`run_generate`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Manifest data file.
    pub data_path: PathBuf,
    /// Directory holding one `.png` per figure, named after the figure.
    pub images_dir: PathBuf,
    /// Extraction parameters.
    pub config: ExtractConfig,
    /// Process without writing the backup or the data file.
    pub dry_run: bool,
}

/// Inputs for [`run_simplify`].
#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    /// Manifest data file.
    pub data_path: PathBuf,
    /// Simplification parameters.
    pub config: SimplifyConfig,
    /// Process without writing the backup or the data file.
    pub dry_run: bool,
}

/// What happened to one entry during extraction.
#[derive(Debug)]
enum EntryOutcome {
    Updated,
    Skipped,
    Failed,
}

/// Extract strokes from images for every manifest entry with a matching
/// image.
///
/// Entries are matched by [`entry_key`] against image slugs. A match that
/// yields points has its `strokes` set to that single stroke. Any other
/// entry keeps its existing `strokes`, with `[]` filled in when absent.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the data file is
/// missing or unreadable, the backup cannot be written, the image
/// directory cannot be listed, or the manifest cannot be saved.
pub fn run_generate(options: &GenerateOptions) -> Result<BatchSummary, IoError> {
    options.config.validate()?;
    if !options.dry_run {
        Checkpoint::new(&options.data_path).ensure(Stage::Extract)?;
    }

    let mut manifest = load_manifest(&options.data_path)?;
    let images = discover_images(&options.images_dir)?;

    let mut summary = BatchSummary::default();
    for entry in manifest.entries_mut() {
        summary.total += 1;
        let Some(key) = entry_key(entry).map(str::to_owned) else {
            summary.skipped += 1;
            continue;
        };

        let outcome = match images.get(&key) {
            Some(path) => generate_entry(entry, &key, path, &options.config),
            None => {
                log::debug!("{key}: no matching image");
                EntryOutcome::Skipped
            }
        };
        if !matches!(outcome, EntryOutcome::Updated) {
            default_strokes(entry);
        }

        match outcome {
            EntryOutcome::Updated => summary.updated += 1,
            EntryOutcome::Skipped => summary.skipped += 1,
            EntryOutcome::Failed => summary.failed += 1,
        }
    }

    finish(&manifest, options.dry_run, Stage::Extract, summary)
}

fn generate_entry(
    entry: &mut Map<String, Value>,
    key: &str,
    path: &Path,
    config: &ExtractConfig,
) -> EntryOutcome {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("{key}: failed to open {}: {e}", path.display());
            return EntryOutcome::Failed;
        }
    };

    match extract_strokes(&bytes, config) {
        Ok(result) if result.stroke.is_empty() => {
            log::debug!("{key}: no pixels at or above threshold {}", config.threshold);
            EntryOutcome::Skipped
        }
        Ok(result) => {
            log::debug!(
                "{key}: {} foreground, {} sampled, {} in path, {} in stroke",
                result.stats.foreground,
                result.stats.sampled,
                result.stats.path_len,
                result.stats.stroke_len,
            );
            entry.insert(STROKES_KEY.to_owned(), strokes_value(&result.stroke));
            EntryOutcome::Updated
        }
        Err(e) => {
            log::warn!("{key}: failed to process {}: {e}", path.display());
            EntryOutcome::Failed
        }
    }
}

/// Give the entry an empty `strokes` list if it has none.
fn default_strokes(entry: &mut Map<String, Value>) {
    entry
        .entry(STROKES_KEY)
        .or_insert_with(|| Value::Array(Vec::new()));
}

/// Flatten and re-simplify the stored strokes of every manifest entry.
///
/// Every entry's `strokes` is rewritten: one simplified stroke when it
/// had points, otherwise `[]`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the data file is
/// missing or unreadable, the backup cannot be written, or the manifest
/// cannot be saved.
pub fn run_simplify(options: &SimplifyOptions) -> Result<BatchSummary, IoError> {
    options.config.validate()?;
    if !options.dry_run {
        Checkpoint::new(&options.data_path).ensure(Stage::Simplify)?;
    }

    let mut manifest = load_manifest(&options.data_path)?;

    let mut summary = BatchSummary::default();
    for entry in manifest.entries_mut() {
        summary.total += 1;
        let label = entry_key(entry).unwrap_or("<unnamed>").to_owned();
        match simplify_entry(entry, &options.config) {
            SimplifyOutcome::Simplified { before, after } => {
                log::debug!("{label}: {before} -> {after} points");
                summary.updated += 1;
            }
            SimplifyOutcome::Emptied => summary.skipped += 1,
            SimplifyOutcome::Malformed => {
                log::warn!("{label}: unrecognized stroke payload, cleared");
                summary.failed += 1;
            }
        }
    }

    finish(&manifest, options.dry_run, Stage::Simplify, summary)
}

fn load_manifest(path: &Path) -> Result<Manifest, IoError> {
    let manifest = Manifest::load(path)?;
    if manifest.is_empty() {
        log::warn!("{} has no entries", path.display());
    } else {
        log::debug!("loaded {} items from {}", manifest.len(), path.display());
    }
    Ok(manifest)
}

fn finish(
    manifest: &Manifest,
    dry_run: bool,
    stage: Stage,
    summary: BatchSummary,
) -> Result<BatchSummary, IoError> {
    if dry_run {
        log::info!("{stage} (dry run): {summary}");
    } else {
        manifest.save()?;
        log::info!("{stage}: {summary}; wrote {}", manifest.path().display());
    }
    Ok(summary)
}
