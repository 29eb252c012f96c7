//! Person-period panel construction.
//!
//! This crate turns source exports into classified panels:
//!
//! - **period**: week and month label sequences with index lookup
//! - **generator**: source-specific canonicalization and cross-join expansion
//! - **classify**: age band, survival and vaccination classifiers
//! - **processor**: applies the classifiers and projects the processed layout
//! - **pipeline**: chunked generation and processing of a whole export

pub mod classify;
pub mod error;
pub mod generator;
pub mod period;
pub mod pipeline;
pub mod processor;

pub use error::{Result, TransformError};
pub use generator::{
    CpzpGenerator, OzpGenerator, PersonPeriodChunks, PersonPeriodGenerator, SourceGenerator,
    cross_join,
};
pub use period::{TimePeriodIndex, months_in_range, weeks_in_range};
pub use pipeline::{ChunkProgress, Panel, PanelSummary, build_panel};
pub use processor::process;
