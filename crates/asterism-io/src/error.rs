//! Errors raised at the filesystem boundary.

use std::path::PathBuf;

use asterism_pipeline::PipelineError;

/// Errors that stop a batch.
///
/// Per-entry problems (an undecodable image, a malformed payload) are
/// not represented here: they are logged and counted, and the batch
/// continues.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The manifest data file does not exist.
    #[error("data file not found: {}", .0.display())]
    DataFileMissing(PathBuf),

    /// Reading a file failed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON, or could not be serialized.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The manifest root is not a list of entries.
    #[error("{}: expected a JSON array of entries", .0.display())]
    NotAnArray(PathBuf),

    /// The image directory could not be listed.
    #[error("failed to list images in {}: {source}", path.display())]
    ImagesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The batch configuration was rejected by the pipeline.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
