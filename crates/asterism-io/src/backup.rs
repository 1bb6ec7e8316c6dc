//! Versioned, write-once backups of the manifest data file.
//!
//! Before a stage first rewrites the data file, a byte-for-byte copy is
//! written next to it as `<file>.bak.<generation>`. Each [`Stage`] owns
//! one generation slot. A slot is filled at most once: later runs find
//! the existing copy and leave it alone, so the backup always holds the
//! data as it was before that stage ever ran.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::IoError;

/// A stage that rewrites the data file and owns a backup generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Stroke extraction from images.
    Extract,
    /// Post-hoc simplification of stored strokes.
    Simplify,
}

impl Stage {
    /// The backup generation this stage writes.
    #[must_use]
    pub const fn generation(self) -> u32 {
        match self {
            Self::Extract => 1,
            Self::Simplify => 2,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extract => f.write_str("extract"),
            Self::Simplify => f.write_str("simplify"),
        }
    }
}

/// What [`Checkpoint::ensure`] found or did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    /// A new backup was written at this path.
    Created(PathBuf),
    /// A backup for this generation already existed at this path.
    Existing(PathBuf),
}

/// Backup slots for one data file.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    data_path: PathBuf,
}

impl Checkpoint {
    /// Backups for the data file at `data_path`.
    #[must_use]
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
        }
    }

    /// Where the backup for `stage` lives.
    #[must_use]
    pub fn backup_path(&self, stage: Stage) -> PathBuf {
        let mut name = self
            .data_path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(format!(".bak.{}", stage.generation()));
        self.data_path.with_file_name(name)
    }

    /// Write the backup for `stage` unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::DataFileMissing`] if the data file does not
    /// exist, [`IoError::Read`] if it cannot be read, and
    /// [`IoError::Write`] if the backup cannot be created.
    pub fn ensure(&self, stage: Stage) -> Result<BackupOutcome, IoError> {
        if !self.data_path.is_file() {
            return Err(IoError::DataFileMissing(self.data_path.clone()));
        }

        let backup = self.backup_path(stage);
        let bytes = std::fs::read(&self.data_path).map_err(|source| IoError::Read {
            path: self.data_path.clone(),
            source,
        })?;
        let file = OpenOptions::new().write(true).create_new(true).open(&backup);
        let mut file = match file {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::debug!("{stage} backup already present at {}", backup.display());
                return Ok(BackupOutcome::Existing(backup));
            }
            Err(e) => return Err(write_error(&backup, e)),
        };

        if let Err(e) = file.write_all(&bytes).and_then(|()| file.sync_all()) {
            // A partial backup must not survive.
            drop(file);
            let _ = std::fs::remove_file(&backup);
            return Err(write_error(&backup, e));
        }

        log::info!("{stage} backup written to {}", backup.display());
        Ok(BackupOutcome::Created(backup))
    }
}

fn write_error(path: &Path, source: std::io::Error) -> IoError {
    IoError::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generations_are_distinct() {
        assert_eq!(Stage::Extract.generation(), 1);
        assert_eq!(Stage::Simplify.generation(), 2);
    }

    #[test]
    fn backup_path_appends_generation() {
        let checkpoint = Checkpoint::new("assets/data/constellations_88.json");
        assert_eq!(
            checkpoint.backup_path(Stage::Extract),
            PathBuf::from("assets/data/constellations_88.json.bak.1"),
        );
        assert_eq!(
            checkpoint.backup_path(Stage::Simplify),
            PathBuf::from("assets/data/constellations_88.json.bak.2"),
        );
    }

    #[test]
    fn missing_data_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = Checkpoint::new(dir.path().join("absent.json"));
        let result = checkpoint.ensure(Stage::Extract);
        assert!(matches!(result, Err(IoError::DataFileMissing(_))));
    }

    #[test]
    fn backup_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        std::fs::write(&data, b"[1]").unwrap();
        let checkpoint = Checkpoint::new(&data);

        let first = checkpoint.ensure(Stage::Simplify).unwrap();
        let BackupOutcome::Created(backup) = first else {
            unreachable!("first ensure creates the backup");
        };
        assert_eq!(std::fs::read(&backup).unwrap(), b"[1]");

        // The data changes; the backup must not.
        std::fs::write(&data, b"[2]").unwrap();
        let second = checkpoint.ensure(Stage::Simplify).unwrap();
        assert_eq!(second, BackupOutcome::Existing(backup.clone()));
        assert_eq!(std::fs::read(&backup).unwrap(), b"[1]");
    }

    #[test]
    fn stages_back_up_independently() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        std::fs::write(&data, b"v1").unwrap();
        let checkpoint = Checkpoint::new(&data);

        checkpoint.ensure(Stage::Extract).unwrap();
        std::fs::write(&data, b"v2").unwrap();
        let simplify = checkpoint.ensure(Stage::Simplify).unwrap();

        assert_eq!(
            simplify,
            BackupOutcome::Created(checkpoint.backup_path(Stage::Simplify))
        );
        assert_eq!(
            std::fs::read(checkpoint.backup_path(Stage::Extract)).unwrap(),
            b"v1"
        );
        assert_eq!(
            std::fs::read(checkpoint.backup_path(Stage::Simplify)).unwrap(),
            b"v2"
        );
    }
}
