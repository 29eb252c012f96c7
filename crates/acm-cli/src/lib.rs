//! CLI library components for the mortality panel tool.

pub mod logging;
pub mod preprocess;
