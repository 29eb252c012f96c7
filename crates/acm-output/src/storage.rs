//! Parquet read and write under a storage root.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{DataFrame, ParquetReader, ParquetWriter, SerReader};
use tracing::debug;

use crate::error::{OutputError, Result};

/// Suffix appended to every stored frame name.
pub const FILE_SUFFIX: &str = "_processed.parquet";

/// File name for a frame name; names already carrying the suffix are kept.
pub fn file_name(name: &str) -> String {
    if name.ends_with(FILE_SUFFIX) {
        name.to_string()
    } else {
        format!("{name}{FILE_SUFFIX}")
    }
}

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Location and size of a written frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Stores frames as Parquet files addressed by name.
#[derive(Debug, Clone)]
pub struct FrameStorage {
    root: PathBuf,
}

impl FrameStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path for `name`; a name may contain subdirectories.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(file_name(name))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Writes `frame`, creating missing parent directories.
    pub fn write(&self, name: &str, frame: &DataFrame) -> Result<StoredFile> {
        let path = self.path_for(name);
        ensure_parent_dir(&path)?;
        let file = File::create(&path).map_err(|source| OutputError::Open {
            path: path.clone(),
            source,
        })?;
        let mut frame = frame.clone();
        let bytes = ParquetWriter::new(file)
            .finish(&mut frame)
            .map_err(|e| OutputError::Parquet {
                path: path.clone(),
                message: e.to_string(),
            })?;
        debug!(path = %path.display(), rows = frame.height(), bytes, "stored frame");
        Ok(StoredFile { path, bytes })
    }

    /// Reads a frame previously written under `name`.
    pub fn read(&self, name: &str) -> Result<DataFrame> {
        read_parquet(&self.path_for(name))
    }
}

/// Reads a Parquet file from an explicit path.
pub fn read_parquet(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            OutputError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            OutputError::Open {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| OutputError::Parquet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}
