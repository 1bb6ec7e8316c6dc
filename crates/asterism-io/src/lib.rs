//! asterism-io: Filesystem boundary for the stroke pipeline.
//!
//! Loads and saves the manifest data file, discovers figure images and
//! matches them to entries by slug, keeps one-time backups of the data
//! file, and runs the extraction and simplification batches over it.
//! All computation is delegated to `asterism-pipeline`.

pub mod backup;
pub mod batch;
pub mod error;
pub mod images;
pub mod manifest;
pub mod slug;

pub use backup::{BackupOutcome, Checkpoint, Stage};
pub use batch::{BatchSummary, GenerateOptions, SimplifyOptions, run_generate, run_simplify};
pub use error::IoError;
pub use manifest::{Manifest, entry_key};
