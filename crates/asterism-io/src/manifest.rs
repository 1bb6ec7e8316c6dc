//! The manifest data file: a JSON list of entry records.
//!
//! The file is read in full, mutated in memory, and written back in full.
//! Entries are kept as raw JSON objects so every field this tool does not
//! own survives a rewrite unchanged, in its original key order.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::IoError;

/// Entry field holding the primary identifier.
pub const SLUG_KEY: &str = "slug";

/// Entry field used as the identifier when there is no slug.
pub const ID_KEY: &str = "id";

/// A loaded manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: Vec<Value>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DataFileMissing`] if `path` does not exist,
    /// [`IoError::Read`] if it cannot be read, [`IoError::Json`] if it
    /// is not valid JSON, and [`IoError::NotAnArray`] if its root is not
    /// a list.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, IoError> {
        let path = path.into();
        if !path.is_file() {
            return Err(IoError::DataFileMissing(path));
        }

        let text = std::fs::read_to_string(&path).map_err(|source| IoError::Read {
            path: path.clone(),
            source,
        })?;
        let root: Value = serde_json::from_str(&text).map_err(|source| IoError::Json {
            path: path.clone(),
            source,
        })?;
        let Value::Array(entries) = root else {
            return Err(IoError::NotAnArray(path));
        };

        Ok(Self { path, entries })
    }

    /// Path the manifest was loaded from and is saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of items in the list, including any non-object items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mutable access to the entry records, in file order. Non-object
    /// items are skipped.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut Map<String, Value>> {
        self.entries.iter_mut().filter_map(Value::as_object_mut)
    }

    /// Write the manifest back to its path as two-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Json`] if serialization fails and
    /// [`IoError::Write`] if the file cannot be written.
    pub fn save(&self) -> Result<(), IoError> {
        let text = serde_json::to_string_pretty(&self.entries).map_err(|source| IoError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, text).map_err(|source| IoError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// The identifier of an entry: its `slug`, or else its `id`.
///
/// Empty strings and non-string values do not count.
#[must_use]
pub fn entry_key(entry: &Map<String, Value>) -> Option<&str> {
    [SLUG_KEY, ID_KEY]
        .into_iter()
        .filter_map(|key| entry.get(key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}
