//! Name-addressed Parquet storage for processed panels.
//!
//! Frames are stored under a root directory as `{name}_processed.parquet`.

mod error;
mod storage;

pub use error::{OutputError, Result};
pub use storage::{
    FILE_SUFFIX, FrameStorage, StoredFile, ensure_parent_dir, file_name, read_parquet,
};
