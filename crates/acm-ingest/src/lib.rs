//! Source export ingestion.
//!
//! Loads the semicolon-separated insurer exports into Polars DataFrames whose
//! columns are pinned to, and checked against, the registered source layout.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use acm_ingest::{IngestOptions, read_source};
//! use acm_model::SourceKind;
//!
//! let df = read_source(Path::new("data/cpzp.csv"), SourceKind::Cpzp, &IngestOptions::default())?;
//! ```

mod error;
mod options;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Options ===
pub use options::{DEFAULT_SEPARATOR, IngestOptions};

// === CSV Reading ===
pub use reader::{read_header, read_source, read_table};
